use async_trait::async_trait;
use clash_viewer::assets::{HeadlessLoader, ModelRequest};
use clash_viewer::clash::{ClashError, ClashResult, ClashSource, StaticClashSource};
use clash_viewer::{Clash, ClashId, LoadingEdge, Schedule, SceneRegistry, ViewerEvent, ViewerSession};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

fn clash(id: ClashId, theme_id: i64, start_time: i64) -> Clash {
    Clash {
        id,
        theme_id,
        name_key: format!("cup_{}", id),
        name_key_secondary: "day_1".to_string(),
        schedule: vec![Schedule {
            id: id * 10,
            registration_time: start_time - 60,
            start_time,
            cancelled: false,
        }],
    }
}

fn session_with(source: Arc<dyn ClashSource>) -> ViewerSession {
    ViewerSession::new(source, SceneRegistry::builtin().unwrap())
}

fn current_id(session: &ViewerSession) -> Option<ClashId> {
    session.current().map(|c| c.id)
}

struct FailingSource;

#[async_trait]
impl ClashSource for FailingSource {
    async fn fetch(&self, _region: &str) -> ClashResult<Vec<Clash>> {
        Err(ClashError::HttpStatus(503, "maintenance".to_string()))
    }
}

struct PanickingSource;

#[async_trait]
impl ClashSource for PanickingSource {
    async fn fetch(&self, region: &str) -> ClashResult<Vec<Clash>> {
        panic!("no route to {}", region)
    }
}

/// Each region's fetch waits until the test releases it.
#[derive(Default)]
struct GatedSource {
    gates: Mutex<HashMap<String, oneshot::Receiver<Vec<Clash>>>>,
}

impl GatedSource {
    fn gate(&self, region: &str) -> oneshot::Sender<Vec<Clash>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(region.to_string(), rx);
        tx
    }
}

#[async_trait]
impl ClashSource for GatedSource {
    async fn fetch(&self, region: &str) -> ClashResult<Vec<Clash>> {
        let gate = self.gates.lock().unwrap().remove(region);
        match gate {
            Some(rx) => rx.await.map_err(|e| ClashError::Http(e.to_string())),
            None => Ok(Vec::new()),
        }
    }
}

#[tokio::test]
async fn test_fetch_settles_on_nearest_clash() {
    let source = StaticClashSource::new(vec![clash(1, 0, 50), clash(2, 1, 10), clash(3, 2, 30)]);
    let mut session = session_with(Arc::new(source));

    session.set_region("euw1");
    assert!(session.is_loading());
    assert_eq!(current_id(&session), None);

    session.settle().await;
    assert!(!session.is_loading());
    assert_eq!(session.clashes().len(), 3);
    assert_eq!(current_id(&session), Some(2));
    assert_eq!(session.scene_key(), "1");
}

#[tokio::test]
async fn test_next_wraps_after_settle() {
    let source = StaticClashSource::new(vec![clash(1, 0, 100), clash(2, 0, 50)]);
    let mut session = session_with(Arc::new(source));
    session.set_region("euw1");
    session.settle().await;
    assert_eq!(current_id(&session), Some(2));

    session.unselect();
    session.next();
    assert_eq!(current_id(&session), Some(1));
    session.next();
    assert_eq!(current_id(&session), Some(2));
    session.next();
    assert_eq!(current_id(&session), Some(1));
    session.previous();
    assert_eq!(current_id(&session), Some(2));
}

#[tokio::test]
async fn test_region_change_refetches_and_resets_selection() {
    let source = Arc::new(
        StaticClashSource::new(vec![clash(1, 0, 100)])
            .with_region("kr", vec![clash(7, 2, 900), clash(8, 2, 300)]),
    );
    let mut session = session_with(source.clone());
    session.set_region("euw1");
    session.settle().await;
    assert_eq!(current_id(&session), Some(1));

    session.set_region("euw1");
    assert!(!session.is_loading());
    assert_eq!(source.fetch_count(), 1);

    session.set_region("kr");
    assert!(session.is_loading());
    assert_eq!(current_id(&session), None);

    session.settle().await;
    assert_eq!(source.fetch_count(), 2);
    assert_eq!(current_id(&session), Some(8));
    assert_eq!(session.region(), Some("kr"));
}

#[tokio::test]
async fn test_failed_fetch_leaves_empty_collection() {
    let mut session = session_with(Arc::new(FailingSource));
    session.set_region("euw1");
    session.settle().await;

    assert!(!session.is_loading());
    assert!(session.clashes().is_empty());
    assert_eq!(current_id(&session), None);
    assert_eq!(session.scene_key(), "0");

    session.next();
    session.previous();
    assert_eq!(current_id(&session), None);
}

#[tokio::test]
async fn test_panicking_source_still_ends_the_fetch() {
    let mut session = session_with(Arc::new(PanickingSource));
    session.set_region("euw1");
    assert!(session.is_loading());

    tokio::time::timeout(Duration::from_secs(5), session.settle())
        .await
        .expect("fetch never reported back");

    assert!(!session.is_loading());
    assert!(session.clashes().is_empty());
    assert_eq!(current_id(&session), None);
}

#[tokio::test]
async fn test_superseded_fetch_is_ignored() {
    let source = Arc::new(GatedSource::default());
    let euw = source.gate("euw1");
    let na = source.gate("na1");
    let mut session = session_with(source.clone());

    session.set_region("euw1");
    session.set_region("na1");

    na.send(vec![clash(5, 1, 40), clash(6, 2, 20)]).unwrap();
    session.settle().await;
    assert_eq!(current_id(&session), Some(6));

    euw.send(vec![clash(1, 0, 1)]).unwrap();
    session.next_event().await;
    assert_eq!(session.clashes().len(), 2);
    assert_eq!(current_id(&session), Some(6));
}

#[tokio::test]
async fn test_asset_loads_gate_auto_selection() {
    let source = StaticClashSource::new(vec![clash(1, 0, 100), clash(2, 2, 50)]);
    let mut session = session_with(Arc::new(source));
    let edges = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&edges);
    session.subscribe(move |edge: LoadingEdge| sink.lock().unwrap().push(edge));

    session.set_region("euw1");
    session.settle().await;
    assert_eq!(*edges.lock().unwrap(), vec![LoadingEdge::Settled]);

    session.next();
    assert_eq!(current_id(&session), Some(1));

    let loader = session.champion_loader(HeadlessLoader::new(), 4);
    let requests = session.scene_requests(false);
    assert_eq!(requests.len(), 1);
    loader.load(&requests[0]).await.unwrap();

    assert_eq!(session.pump(), 2);
    assert!(!session.is_loading());
    assert_eq!(
        *edges.lock().unwrap(),
        vec![LoadingEdge::Settled, LoadingEdge::Started, LoadingEdge::Settled]
    );
    // Settling again re-selects the nearest clash
    assert_eq!(current_id(&session), Some(2));

    // A cached model does not touch the loading state
    loader.load(&requests[0]).await.unwrap();
    assert_eq!(session.pump(), 0);
    assert_eq!(edges.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_failed_asset_load_still_settles() {
    let mut session = session_with(Arc::new(StaticClashSource::default()));
    session.settle().await;

    let loader = session.champion_loader(HeadlessLoader::new(), 4);
    let broken = ModelRequest {
        champion_key: "not-a-champion".to_string(),
        skin_index: 0,
        enable_texture: false,
        set_frame: None,
        anim_name: None,
        animation_speed: 700.0,
    };
    assert!(loader.load(&broken).await.is_err());

    session.pump();
    assert!(!session.is_loading());
    assert_eq!(session.loading().counter().in_flight(), 0);
}

#[tokio::test]
async fn test_counter_never_goes_negative() {
    let mut session = session_with(Arc::new(StaticClashSource::default()));
    session.settle().await;

    session.apply(ViewerEvent::AssetLoadFinished);
    assert_eq!(session.apply(ViewerEvent::AssetLoadStarted), Some(LoadingEdge::Started));
    assert!(session.is_loading());
    assert_eq!(session.apply(ViewerEvent::AssetLoadFinished), Some(LoadingEdge::Settled));
}

#[tokio::test]
async fn test_select_by_id() {
    let source = StaticClashSource::new(vec![clash(1, 0, 100), clash(2, 0, 50)]);
    let mut session = session_with(Arc::new(source));
    session.set_region("euw1");
    session.settle().await;

    session.select_by_id(1).unwrap();
    assert_eq!(current_id(&session), Some(1));

    let err = session.select_by_id(99).unwrap_err();
    assert!(matches!(err, ClashError::UnknownClash { id: 99 }));
    assert_eq!(current_id(&session), Some(1));
}

#[tokio::test]
async fn test_unvalidated_select_accepts_foreign_clash() {
    let mut session = session_with(Arc::new(StaticClashSource::new(vec![clash(1, 0, 100)])));
    session.set_region("euw1");
    session.settle().await;

    session.select(clash(42, 99, 5));
    assert_eq!(current_id(&session), Some(42));
    assert_eq!(session.scene_key(), "oops");

    session.next();
    assert_eq!(current_id(&session), Some(1));
}
