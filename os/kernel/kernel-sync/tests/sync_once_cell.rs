use kernel_sync::SyncOnceCell;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;

#[test]
fn empty_until_set() {
    let cell = SyncOnceCell::<u32>::new();
    assert!(!cell.is_initialized());
    assert_eq!(cell.get(), None);

    cell.set(7).expect("first set");
    assert!(cell.is_initialized());
    assert_eq!(cell.get(), Some(&7));
}

#[test]
fn second_set_returns_the_value() {
    let cell = SyncOnceCell::new();
    assert_eq!(cell.set("first"), Ok(()));
    assert_eq!(cell.set("second"), Err("second"));
    assert_eq!(cell.get(), Some(&"first"));
}

#[test]
fn racing_writers_publish_one_value() {
    let cell = Arc::new(SyncOnceCell::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cell = Arc::clone(&cell);
            thread::spawn(move || cell.set(i).is_ok())
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
    assert!(cell.get().is_some_and(|v| (0..8).contains(v)));
}

#[test]
fn value_is_dropped_with_the_cell() {
    let value = Rc::new(());
    {
        let cell = SyncOnceCell::new();
        cell.set(Rc::clone(&value)).unwrap();
        assert_eq!(Rc::strong_count(&value), 2);
    }
    assert_eq!(Rc::strong_count(&value), 1);
}
