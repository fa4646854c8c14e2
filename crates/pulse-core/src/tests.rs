//! Unit tests for pulse-core

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::cache::{CacheBackend, CacheEntry, CacheStore, DiskBackend, MemoryBackend};
use crate::fingerprint::{overall_fingerprint, post_fingerprint, stable_hash};
use crate::model::{OverallAnalysis, Post, PostAnalysis};

fn sample_post(id: &str, likes: u32, comments: u32, shares: u32) -> Post {
    Post {
        id: id.to_string(),
        created_time: Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap(),
        message: "Launch day! Big announcement coming.".to_string(),
        full_picture_url: None,
        permalink_url: None,
        likes,
        comments,
        shares,
        reach: Some(1200),
    }
}

fn sample_analysis(post_id: &str, quality: u8) -> PostAnalysis {
    PostAnalysis {
        post_id: post_id.to_string(),
        problems: vec!["Too short".to_string()],
        improvements: vec!["Add a call to action".to_string()],
        content_ideas: vec!["Behind the scenes".to_string()],
        quality_score: quality,
        engagement_score: 6,
    }
}

#[test]
fn stable_hash_is_deterministic_and_fixed_width() {
    assert_eq!(stable_hash("hello"), stable_hash("hello"));
    assert_eq!(stable_hash("hello").len(), 16);
    assert_eq!(stable_hash("").len(), 16);
    assert_ne!(stable_hash("hello"), stable_hash("hello!"));
}

#[test]
fn post_fingerprint_tracks_visible_fields() {
    let post = sample_post("p1", 10, 2, 1);
    assert_eq!(post_fingerprint(&post, 500), post_fingerprint(&post, 500));

    let mut more_likes = post.clone();
    more_likes.likes += 1;
    assert_ne!(post_fingerprint(&post, 500), post_fingerprint(&more_likes, 500));

    let mut no_reach = post.clone();
    no_reach.reach = None;
    assert_ne!(post_fingerprint(&post, 500), post_fingerprint(&no_reach, 500));

    let mut later = post.clone();
    later.created_time = Utc.with_ymd_and_hms(2024, 5, 18, 12, 0, 0).unwrap();
    assert_ne!(post_fingerprint(&post, 500), post_fingerprint(&later, 500));
}

#[test]
fn post_fingerprint_ignores_text_past_truncation_boundary() {
    let mut post = sample_post("p1", 10, 2, 1);
    post.message = "a".repeat(30);

    let mut edited_past_boundary = post.clone();
    edited_past_boundary.message.push_str("tail");
    assert_eq!(
        post_fingerprint(&post, 30),
        post_fingerprint(&edited_past_boundary, 30)
    );

    let mut edited_within = post.clone();
    edited_within.message.replace_range(0..1, "b");
    assert_ne!(post_fingerprint(&post, 30), post_fingerprint(&edited_within, 30));
}

#[test]
fn overall_fingerprint_covers_posts_and_scores() {
    let posts = vec![sample_post("p1", 10, 2, 1), sample_post("p2", 3, 0, 0)];
    let analyses = vec![sample_analysis("p1", 7), sample_analysis("p2", 4)];
    let baseline = overall_fingerprint(&posts, &analyses);
    assert_eq!(baseline, overall_fingerprint(&posts, &analyses));

    let mut rescored = analyses.clone();
    rescored[1].quality_score = 9;
    assert_ne!(baseline, overall_fingerprint(&posts, &rescored));

    let mut more_shares = posts.clone();
    more_shares[0].shares += 5;
    assert_ne!(baseline, overall_fingerprint(&more_shares, &analyses));
}

#[test]
fn cache_store_round_trips_entries() {
    let backend = Arc::new(MemoryBackend::default());
    let mut store: CacheStore<PostAnalysis> = CacheStore::open(backend, "post_analyses");

    store.put(
        "p1",
        CacheEntry {
            fingerprint: "abc".to_string(),
            value: sample_analysis("p1", 7),
        },
    );
    assert_eq!(store.lookup("p1", "abc").map(|a| a.quality_score), Some(7));
    assert!(store.lookup("p1", "stale").is_none());
    assert!(store.lookup("p2", "abc").is_none());
}

#[test]
fn stale_fingerprint_invalidates_one_entry_only() {
    let backend = Arc::new(MemoryBackend::default());
    let mut store: CacheStore<PostAnalysis> = CacheStore::open(backend, "post_analyses");
    store.put(
        "p1",
        CacheEntry {
            fingerprint: "one".to_string(),
            value: sample_analysis("p1", 7),
        },
    );
    store.put(
        "p2",
        CacheEntry {
            fingerprint: "two".to_string(),
            value: sample_analysis("p2", 5),
        },
    );

    assert!(store.lookup("p1", "changed").is_none());
    assert!(store.lookup("p2", "two").is_some());
}

#[test]
fn corrupt_storage_is_treated_as_empty() {
    let backend = Arc::new(MemoryBackend::default());
    backend.store("post_analyses", "{not json");
    let store: CacheStore<PostAnalysis> = CacheStore::open(backend, "post_analyses");
    assert!(store.is_empty());
}

#[test]
fn disk_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let backend: Arc<dyn CacheBackend> = Arc::new(DiskBackend::new(dir.path()));
    {
        let mut store: CacheStore<OverallAnalysis> =
            CacheStore::open(Arc::clone(&backend), "overall_analysis");
        store.put(
            "set-1",
            CacheEntry {
                fingerprint: "set-1".to_string(),
                value: OverallAnalysis::placeholder("cached", 80),
            },
        );
    }
    let reopened: CacheStore<OverallAnalysis> =
        CacheStore::open(backend, "overall_analysis");
    assert_eq!(
        reopened.lookup("set-1", "set-1").map(|o| o.marketing_health_score),
        Some(80)
    );
}

#[test]
fn failed_writes_do_not_poison_the_store() {
    struct ReadOnlyBackend;
    impl CacheBackend for ReadOnlyBackend {
        fn load(&self, _namespace: &str) -> Option<String> {
            None
        }
        fn store(&self, _namespace: &str, _payload: &str) {}
    }

    let mut store: CacheStore<PostAnalysis> =
        CacheStore::open(Arc::new(ReadOnlyBackend), "post_analyses");
    store.put(
        "p1",
        CacheEntry {
            fingerprint: "abc".to_string(),
            value: sample_analysis("p1", 5),
        },
    );
    assert_eq!(store.len(), 1);
}
