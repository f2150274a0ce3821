// ==========================================
// 并发控制测试
// ==========================================
// 职责: 验证多线程变更的串行化、通知顺序与读者快照一致性
// ==========================================


use floor_config::config::StoreSettings;
use floor_config::engine::events::{FnSubscriber, StoreEvent};
use floor_config::engine::ordering::is_dense;
use floor_config::{Channel, FloorStore, InMemorySnapshotRepository, PageConfig};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;
use test_helpers::{floor_form, image_form};

const WRITERS: usize = 8;
const ADDS_PER_WRITER: usize = 10;

fn setup_store() -> (Arc<FloorStore>, Arc<InMemorySnapshotRepository>) {
    let repo = Arc::new(InMemorySnapshotRepository::new());
    let store = FloorStore::open(repo.clone(), StoreSettings::default()).unwrap();
    (Arc::new(store), repo)
}

#[test]
fn test_concurrent_adds_are_serialized() {
    let (store, repo) = setup_store();
    let generations: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&generations);
    store.subscribe(Arc::new(FnSubscriber(move |event: &StoreEvent, _: &[PageConfig]| {
        sink.lock().unwrap().push(event.generation);
    })));
    let saves_before = repo.save_count();

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let channel = if w % 2 == 0 { Channel::Mobile } else { Channel::Web };
                for i in 0..ADDS_PER_WRITER {
                    let outcome = store.add_floor(channel, floor_form(&format!("w{}-{}", w, i), vec![]));
                    assert!(outcome.is_applied());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total = (WRITERS * ADDS_PER_WRITER) as u64;
    assert_eq!(store.generation(), total);
    assert_eq!(repo.save_count() - saves_before, total as usize);

    // 每个渠道: 1 个种子楼层 + 一半写入
    for channel in Channel::ALL {
        let floors = store.get_floors(channel);
        assert_eq!(floors.len(), 1 + WRITERS / 2 * ADDS_PER_WRITER);
        assert!(is_dense(&floors));
        let ids: HashSet<_> = floors.iter().map(|f| f.id.clone()).collect();
        assert_eq!(ids.len(), floors.len());
    }

    // 通知按代数严格递增
    let generations = generations.lock().unwrap();
    let expected: Vec<u64> = (1..=total).collect();
    assert_eq!(*generations, expected);
}

#[test]
fn test_readers_always_see_consistent_snapshots() {
    let (store, _repo) = setup_store();
    let floor_id = store.get_floors(Channel::Mobile)[0].id.clone();

    let writer = {
        let store = Arc::clone(&store);
        let floor_id = floor_id.clone();
        thread::spawn(move || {
            for i in 0..50 {
                store.add_image_to_floor(Channel::Mobile, &floor_id, image_form(&format!("https://img/{}.png", i)));
                if i % 3 == 0 {
                    let first = store.get_floor_by_id(Channel::Mobile, &floor_id).unwrap().images[0]
                        .id
                        .clone();
                    store.delete_floor_image(Channel::Mobile, &floor_id, &first);
                }
                let ids: Vec<String> = store
                    .get_floor_by_id(Channel::Mobile, &floor_id)
                    .unwrap()
                    .images
                    .iter()
                    .rev()
                    .map(|img| img.id.clone())
                    .collect();
                store.reorder_floor_images(Channel::Mobile, &floor_id, &ids);
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut last_generation = 0;
                for _ in 0..200 {
                    let snapshot = store.snapshot();
                    assert!(snapshot.generation >= last_generation);
                    last_generation = snapshot.generation;
                    for config in &snapshot.page_configs {
                        assert!(is_dense(&config.floors));
                        for floor in &config.floors {
                            assert!(is_dense(&floor.images));
                        }
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
