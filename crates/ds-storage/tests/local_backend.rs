//! End-to-end checks against the local filesystem backend.

use ds_core::{Period, Sector, StorageLayout};
use ds_storage::{Baseline, BaselineResolver, Catalog, ImageStore, ObjectImageStore, commit_message};
use pretty_assertions::assert_eq;

fn period(s: &str) -> Period {
    s.parse().unwrap()
}

#[tokio::test]
async fn stored_photo_becomes_next_months_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let store = ObjectImageStore::local(dir.path()).unwrap();
    let layout = StorageLayout::default();
    let desk = Sector::new("Desk").unwrap();
    let january = period("2025-01");

    let path = layout.path_for(&desk, january);
    store
        .write(&path, b"\xff\xd8january desk", &commit_message(&desk, january))
        .await
        .unwrap();

    let resolver = BaselineResolver::new(&store, &layout);
    let baseline = resolver
        .resolve_or_previous(&desk, None, period("2025-02"))
        .await
        .unwrap();
    let Baseline::Found(image) = baseline else {
        panic!("expected January photo as baseline");
    };
    assert_eq!(image.bytes, b"\xff\xd8january desk");
    assert_eq!(image.sector, desk);

    let catalog = Catalog::new(&store, &layout);
    assert_eq!(catalog.list_periods().await.unwrap(), vec![january]);
    assert_eq!(catalog.list_sectors(january).await.unwrap(), vec![desk]);
}

#[tokio::test]
async fn custom_root_is_respected() {
    let dir = tempfile::tempdir().unwrap();
    let store = ObjectImageStore::local(dir.path()).unwrap();
    let layout = StorageLayout::new("rooms/bedroom");
    let bed = Sector::new("Bed").unwrap();

    store
        .write(&layout.path_for(&bed, period("2025-03")), b"bed", "m")
        .await
        .unwrap();

    assert!(dir.path().join("rooms/bedroom/2025-03/Bed.jpg").exists());
    let periods = Catalog::new(&store, &layout).list_periods().await.unwrap();
    assert_eq!(periods, vec![period("2025-03")]);
}
