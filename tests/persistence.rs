use noted::{App, CanvasTransform, Config, FileStorage, NoteStore, PointerEvent, Storage, Tool, ViewMode};

fn config_in(dir: &std::path::Path) -> Config {
    Config {
        data_dir: Some(dir.to_path_buf()),
        ..Config::default()
    }
}

#[test]
fn notes_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let (id, color) = {
        let storage = FileStorage::open(config.resolved_data_dir().unwrap()).unwrap();
        let mut app = App::new(config.clone(), storage);
        let id = app.create_note();
        let mut note = app.store().get(&id).unwrap().clone();
        note.title = "Call the plumber".to_string();
        note.content = "before friday".to_string();
        app.store_mut().update(note).unwrap();
        let color = app.store_mut().next_color(&id).unwrap();

        let canvas = app.open_drawing(&id, CanvasTransform::identity(120, 80)).unwrap();
        canvas.select_tool(Tool::Circle);
        canvas.input(PointerEvent::Down([60.0, 40.0]));
        canvas.input(PointerEvent::Move([60.0, 70.0]));
        canvas.input(PointerEvent::Up);
        app.save_drawing().unwrap();
        (id, color)
    };

    let storage = FileStorage::open(dir.path()).unwrap();
    let app = App::new(config, storage);
    let note = app.store().get(&id).expect("note should be reloaded");
    assert_eq!(note.title, "Call the plumber");
    assert_eq!(note.content, "before friday");
    assert_eq!(note.color, color);
    assert!(note.drawing.as_deref().unwrap().starts_with("data:image/png;base64,"));
    assert_eq!(app.store().mode(), ViewMode::List);
}

#[test]
fn corrupt_storage_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::open(dir.path()).unwrap();
    storage.set_item("notes", "[{\"id\": ").unwrap();

    let mut store = NoteStore::open(storage, "notes");
    assert!(store.notes().is_empty());

    // The next write replaces the corrupt entry.
    store.create();
    let reopened = NoteStore::open(FileStorage::open(dir.path()).unwrap(), "notes");
    assert_eq!(reopened.notes().len(), 1);
}

#[test]
fn deletions_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = NoteStore::open(FileStorage::open(dir.path()).unwrap(), "notes");
    let a = store.create().id.clone();
    let b = store.create().id.clone();
    store.delete(&a);

    let reopened = NoteStore::open(FileStorage::open(dir.path()).unwrap(), "notes");
    let ids: Vec<_> = reopened.notes().iter().map(|n| n.id.clone()).collect();
    assert_eq!(ids, vec![b]);
}
