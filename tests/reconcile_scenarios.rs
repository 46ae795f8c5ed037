//! End-to-end reconciliation runs against an in-memory emoji service

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use emoji_sync::discord::EmojiApi;
use emoji_sync::emoji_cache::EmojiCache;
use emoji_sync::errors::{RemoteError, RemoteResult};
use emoji_sync::fingerprint::{EncodedImage, Fingerprint};
use emoji_sync::models::{ImageKind, RemoteEmoji};
use emoji_sync::progress::SilentProgress;
use emoji_sync::sync::{Reconciler, SyncAction, SyncReport};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List,
    Create { name: String, data_uri: String },
    Delete { id: String },
}

#[derive(Default)]
struct FakeState {
    emojis: Vec<RemoteEmoji>,
    next_id: u64,
    calls: Vec<Call>,
}

/// Behaves like the real service: ids are assigned on create, deleting an
/// unknown id fails with `UnknownEmoji`.
#[derive(Clone, Default)]
struct FakeEmojiApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeEmojiApi {
    fn with_emojis(emojis: &[(&str, &str)]) -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.next_id = 100;
            state.emojis = emojis
                .iter()
                .map(|(id, name)| RemoteEmoji {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect();
        }
        api
    }

    fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn mutating_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| *call != Call::List)
            .collect()
    }

    fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn remote_names(&self) -> HashSet<String> {
        self.state
            .lock()
            .unwrap()
            .emojis
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }
}

#[async_trait]
impl EmojiApi for FakeEmojiApi {
    async fn list_emojis(&self) -> RemoteResult<Vec<RemoteEmoji>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List);
        Ok(state.emojis.clone())
    }

    async fn create_emoji(&self, name: &str, image: &EncodedImage) -> RemoteResult<RemoteEmoji> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create {
            name: name.to_string(),
            data_uri: image.data_uri().to_string(),
        });
        state.next_id += 1;
        let emoji = RemoteEmoji {
            id: state.next_id.to_string(),
            name: name.to_string(),
        };
        state.emojis.push(emoji.clone());
        Ok(emoji)
    }

    async fn delete_emoji(&self, id: &str) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete { id: id.to_string() });
        let before = state.emojis.len();
        state.emojis.retain(|e| e.id != id);
        if state.emojis.len() == before {
            return Err(RemoteError::UnknownEmoji { id: id.to_string() });
        }
        Ok(())
    }
}

struct Workspace {
    _temp_dir: TempDir,
    images: PathBuf,
    cache_file: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let images = temp_dir.path().join("images");
        std::fs::create_dir(&images).unwrap();
        let cache_file = temp_dir.path().join("emoji_cache.json");
        Self {
            _temp_dir: temp_dir,
            images,
            cache_file,
        }
    }

    fn write_image(&self, file_name: &str, data: &[u8]) -> PathBuf {
        let path = self.images.join(file_name);
        std::fs::write(&path, data).unwrap();
        path
    }

    fn remove_image(&self, file_name: &str) {
        std::fs::remove_file(self.images.join(file_name)).unwrap();
    }

    fn write_cache(&self, json: &str) {
        std::fs::write(&self.cache_file, json).unwrap();
    }

    async fn run(&self, api: &FakeEmojiApi) -> SyncReport {
        let cache = EmojiCache::load(&self.cache_file).await.unwrap();
        let mut reconciler = Reconciler::new(api.clone(), cache, &self.images);
        reconciler.run(&SilentProgress).await.unwrap()
    }

    async fn saved_cache(&self) -> EmojiCache {
        EmojiCache::load(&self.cache_file).await.unwrap()
    }
}

fn fingerprint_of(path: &Path) -> Fingerprint {
    Fingerprint::of_bytes(&std::fs::read(path).unwrap())
}

#[tokio::test]
async fn test_new_images_are_created() {
    let workspace = Workspace::new();
    let smile = workspace.write_image("smile.png", b"smile pixels");
    let wave = workspace.write_image("wave.gif", b"wave frames");
    let api = FakeEmojiApi::with_emojis(&[]);

    let report = workspace.run(&api).await;

    assert_eq!(report.created(), 2);
    assert_eq!(report.deleted(), 0);

    let calls = api.mutating_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| matches!(call, Call::Create { .. })));
    assert!(calls.contains(&Call::Create {
        name: "smile".into(),
        data_uri: EncodedImage::new(b"smile pixels", ImageKind::Png)
            .data_uri()
            .to_string(),
    }));

    let cache = workspace.saved_cache().await;
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("smile").unwrap().fingerprint, fingerprint_of(&smile));
    assert_eq!(cache.get("wave").unwrap().fingerprint, fingerprint_of(&wave));
}

#[tokio::test]
async fn test_removed_image_is_deleted() {
    let workspace = Workspace::new();
    workspace.write_cache(r#"{"old": {"id": "1", "key": "abc"}}"#);
    let api = FakeEmojiApi::with_emojis(&[("1", "old")]);

    let report = workspace.run(&api).await;

    assert_eq!(api.mutating_calls(), vec![Call::Delete { id: "1".into() }]);
    assert_eq!(report.action_for("old"), Some(&SyncAction::Deleted { id: "1".into() }));
    assert!(workspace.saved_cache().await.is_empty());
}

#[tokio::test]
async fn test_in_sync_emoji_is_left_alone() {
    let workspace = Workspace::new();
    let smile = workspace.write_image("smile.png", b"smile pixels");
    let key = fingerprint_of(&smile);
    workspace.write_cache(&format!(r#"{{"smile": {{"id": "42", "key": "{}"}}}}"#, key));
    let api = FakeEmojiApi::with_emojis(&[("42", "smile")]);

    let report = workspace.run(&api).await;

    assert!(api.mutating_calls().is_empty());
    assert_eq!(report.action_for("smile"), Some(&SyncAction::Unchanged));
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let workspace = Workspace::new();
    workspace.write_image("smile.png", b"smile pixels");
    workspace.write_image("wave.gif", b"wave frames");
    workspace.write_image("party.jpeg", b"party");
    let api = FakeEmojiApi::with_emojis(&[]);

    let first = workspace.run(&api).await;
    assert_eq!(first.created(), 3);
    api.clear_calls();

    let second = workspace.run(&api).await;

    assert!(api.mutating_calls().is_empty());
    assert_eq!(second.unchanged(), 3);
    assert!(second.is_noop());
}

#[tokio::test]
async fn test_changed_image_is_replaced() {
    let workspace = Workspace::new();
    let smile = workspace.write_image("smile.png", b"version one");
    let api = FakeEmojiApi::with_emojis(&[]);

    workspace.run(&api).await;
    let old_id = workspace.saved_cache().await.get("smile").unwrap().remote_id.clone();
    api.clear_calls();

    workspace.write_image("smile.png", b"version two");
    let report = workspace.run(&api).await;

    let calls = api.mutating_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], Call::Delete { id: old_id.clone() });
    assert!(matches!(&calls[1], Call::Create { name, .. } if name == "smile"));

    let entry = workspace.saved_cache().await.get("smile").cloned().unwrap();
    assert_ne!(entry.remote_id, old_id);
    assert_eq!(entry.fingerprint, fingerprint_of(&smile));
    assert_eq!(
        report.action_for("smile"),
        Some(&SyncAction::Replaced {
            old_id,
            new_id: entry.remote_id.clone()
        })
    );
}

#[tokio::test]
async fn test_remote_mirrors_directory_after_mixed_changes() {
    let workspace = Workspace::new();
    workspace.write_image("smile.png", b"smile");
    workspace.write_image("wave.gif", b"wave");
    let api = FakeEmojiApi::with_emojis(&[]);
    workspace.run(&api).await;

    workspace.remove_image("wave.gif");
    workspace.write_image("party.jpg", b"party");
    workspace.write_image("notes.txt", b"not an image");
    let report = workspace.run(&api).await;

    assert_eq!(report.deleted(), 1);
    assert_eq!(report.created(), 1);
    assert_eq!(report.unchanged(), 1);
    assert_eq!(
        api.remote_names(),
        HashSet::from(["smile".to_string(), "party".to_string()])
    );

    let cache = workspace.saved_cache().await;
    let names: HashSet<&str> = cache.names().collect();
    assert_eq!(names, HashSet::from(["smile", "party"]));
}
