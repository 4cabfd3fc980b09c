use keyed_pool::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::{
    sync::{Mutex, Once},
    thread::{self, ThreadId},
};

// records are tagged with the test thread, ids may be reused across tests
struct CaptureLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target().starts_with("keyed_pool") {
            self.records
                .lock()
                .unwrap()
                .push((
                    thread::current().id(),
                    record.level(),
                    record.args().to_string(),
                ));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

fn warnings_about(id: PrototypeId) -> usize {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
    let needle = format!("{id} ");
    let current = thread::current().id();
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(owner, level, message)| {
            *owner == current && *level == Level::Warn && message.contains(&needle)
        })
        .count()
}

struct Light {
    on: bool,
}

impl Poolable for Light {
    fn is_active(&self) -> bool {
        self.on
    }

    fn activate(&mut self) {
        self.on = true;
    }

    fn deactivate(&mut self) {
        self.on = false;
    }
}

struct LightAllocator;

impl PoolAllocator<u8> for LightAllocator {
    type Scope = ();
    type Instance = Light;

    fn allocate(&self, _prototype: &u8, _scope: &()) -> Light {
        Light { on: false }
    }

    fn default_scope(&self) {}

    fn create_scope(&self, _prototype: &u8) {}
}

#[test]
fn test_release_unknown_prototype_warns() {
    let known = Prototype::new(1_u8);
    let stranger = Prototype::new(1_u8);
    let mut pool = PoolManager::new(LightAllocator);
    assert_eq!(warnings_about(stranger.id()), 0);

    let instance = pool.acquire(&known, None).unwrap();
    assert!(pool.release(&stranger, &instance).is_ok());
    assert!(!instance.borrow().is_active());
    assert_eq!(warnings_about(stranger.id()), 1);

    // the fallback scope is recorded, the anomaly is reported once
    instance.borrow_mut().activate();
    pool.release(&stranger, &instance).unwrap();
    assert_eq!(warnings_about(stranger.id()), 1);
}

#[test]
fn test_regular_release_does_not_warn() {
    let prefab = Prototype::new(2_u8);
    let mut pool = PoolManager::new(LightAllocator);
    assert_eq!(warnings_about(prefab.id()), 0);

    pool.fill(&prefab, 2, None).unwrap();
    let instance = pool.acquire(&prefab, None).unwrap();
    pool.release(&prefab, &instance).unwrap();
    assert_eq!(pool.release_all(&prefab), 0);
    assert_eq!(warnings_about(prefab.id()), 0);
}

#[test]
fn test_release_all_warns_on_borrowed() {
    let prefab = Prototype::new(3_u8);
    let mut pool = PoolManager::new(LightAllocator);
    assert_eq!(warnings_about(prefab.id()), 0);

    let first = pool.acquire(&prefab, None).unwrap();
    let second = pool.acquire(&prefab, None).unwrap();
    let guard = second.borrow();
    assert_eq!(pool.release_all(&prefab), 1);
    assert!(guard.is_active());
    drop(guard);

    assert!(!first.borrow().is_active());
    assert_eq!(warnings_about(prefab.id()), 1);
}
