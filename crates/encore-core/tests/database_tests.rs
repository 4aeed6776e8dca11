use std::fs;
use std::path::Path;

use encore_core::{Database, ErrorKind, Song, SongItem};
use tempfile::tempdir;

fn seed_song_x(db: &mut Database) -> Song {
    db.songs_mut()
        .add_song_item(SongItem {
            id: 7,
            artist: "Band".to_string(),
            title: "X".to_string(),
            path: None,
        })
        .unwrap();
    Song::new("Band", "X")
}

fn select(db: &mut Database, name: &str, score: u32) {
    let id = db.players().lookup(name).unwrap();
    db.set_current_player(id).unwrap();
    db.set_current_score(score).unwrap();
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

#[test]
fn test_end_to_end_hiscore_and_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db").join("database.xml");

    {
        let mut db = Database::open(&path);
        db.add_player("Alice", None, None).unwrap();
        let song = seed_song_x(&mut db);
        assert_eq!(db.add_song(&song).unwrap(), 7);

        select(&mut db, "Alice", 100);
        assert!(db.reached_hiscore(&song));
        db.add_hiscore(&song).unwrap();

        select(&mut db, "Alice", 50);
        assert!(!db.reached_hiscore(&song));
        select(&mut db, "Alice", 150);
        assert!(db.reached_hiscore(&song));
        assert_eq!(db.hiscores().len(), 1);
    }

    let mut db = Database::open(&path);
    let song = Song::new("Band", "X");
    assert_eq!(db.songs().lookup(&song), Some(7));
    let alice = db.players().lookup("Alice").unwrap();
    assert_eq!(db.hiscores().best(7, alice, "vocals"), Some(100));

    select(&mut db, "Alice", 100);
    assert!(!db.reached_hiscore(&song));
    select(&mut db, "Alice", 101);
    assert!(db.reached_hiscore(&song));
}

#[test]
fn test_round_trip_preserves_everything() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.xml");

    let mut db = Database::open(&path);
    db.add_player("Alice", Some(" alice & co.png "), None).unwrap();
    db.add_player("Bob <the builder>", None, Some(4)).unwrap();
    let a = Song::new("Artist \"Quoted\"", "First").with_path("/songs/first");
    let b = Song::new("Artist", "Second");
    db.add_song(&a).unwrap();
    db.add_song(&b).unwrap();

    select(&mut db, "Alice", 9000);
    db.set_current_track("guitar").unwrap();
    db.add_hiscore(&a).unwrap();
    select(&mut db, "Bob <the builder>", 1234);
    db.add_hiscore(&b).unwrap();
    db.save().unwrap();

    let players: Vec<_> = db.players().iter().cloned().collect();
    let songs: Vec<_> = db.songs().iter().cloned().collect();
    let hiscores: Vec<_> = db.hiscores().iter().cloned().collect();
    db.close().unwrap();

    let reopened = Database::open(&path);
    let reopened_players: Vec<_> = reopened.players().iter().cloned().collect();
    assert_eq!(reopened_players.len(), players.len());
    for (before, after) in players.iter().zip(&reopened_players) {
        assert_eq!(
            (before.id, &before.name, &before.picture),
            (after.id, &after.name, &after.picture)
        );
    }
    assert_eq!(reopened.songs().iter().cloned().collect::<Vec<_>>(), songs);
    assert_eq!(reopened.hiscores().iter().cloned().collect::<Vec<_>>(), hiscores);
}

#[test]
fn test_open_never_fails_on_bad_files() {
    let dir = tempdir().unwrap();
    let cases = [
        "",
        "definitely not xml",
        "<encore><players></encore>",
        r#"<encore><players><player id="zero" name="A"/></players></encore>"#,
        r#"<encore><songs><song title="no id"/></songs></encore>"#,
    ];

    for (i, content) in cases.iter().enumerate() {
        let path = dir.path().join(format!("bad{i}.xml"));
        write(&path, content);
        let db = Database::open(&path);
        assert!(db.players().is_empty());
        assert!(db.songs().is_empty());
        assert!(db.hiscores().is_empty());
    }
}

#[test]
fn test_direct_load_reports_error_kind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.xml");
    let cases = [
        ("<encore><players>", ErrorKind::Parse),
        ("<encore></wrong>", ErrorKind::Parse),
        ("<players/>", ErrorKind::TypeMismatch),
        (
            r#"<encore><songs><song id="1.5" title="X"/></songs></encore>"#,
            ErrorKind::TypeMismatch,
        ),
        (
            r#"<encore><players><player name="NoId"/></players></encore>"#,
            ErrorKind::Validation,
        ),
        (
            r#"<encore><songs><song title="NoId"/></songs></encore>"#,
            ErrorKind::Validation,
        ),
        (
            r#"<encore>
                 <players><player id="0" name="A"/></players>
                 <songs><song id="0" title="S"/></songs>
                 <hiscores><hiscore playerid="0" songid="0">10001</hiscore></hiscores>
               </encore>"#,
            ErrorKind::Validation,
        ),
    ];

    let mut db = Database::open(&path);
    for (content, kind) in cases {
        write(&path, content);
        let err = db.load().unwrap_err();
        assert_eq!(err.kind(), kind, "content: {content}");
    }

    fs::remove_file(&path).unwrap();
    let err = db.load().unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_add_hiscore_with_unresolved_ids_stores_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.xml");

    let mut db = Database::open(&path);
    let unknown = Song::new("Nobody", "Nothing");
    db.add_player("Alice", None, None).unwrap();
    select(&mut db, "Alice", 500);

    let err = db.add_hiscore(&unknown).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert!(!db.reached_hiscore(&unknown));
    assert!(db.hiscores().is_empty());

    db.players_mut().clear_current();
    let known = seed_song_x(&mut db);
    let err = db.add_hiscore(&known).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert!(db.hiscores().is_empty());
}

#[test]
fn test_reached_hiscore_does_not_mutate() {
    let dir = tempdir().unwrap();
    let mut db = Database::open(dir.path().join("database.xml"));
    db.add_player("Alice", None, None).unwrap();
    let song = seed_song_x(&mut db);

    select(&mut db, "Alice", 300);
    for _ in 0..3 {
        assert!(db.reached_hiscore(&song));
    }
    assert!(db.hiscores().is_empty());
}

#[test]
fn test_score_above_maximum_is_rejected() {
    let dir = tempdir().unwrap();
    let mut db = Database::open(dir.path().join("database.xml"));
    db.add_player("Alice", None, None).unwrap();
    let song = seed_song_x(&mut db);

    select(&mut db, "Alice", encore_core::MAX_SCORE + 1);
    let err = db.add_hiscore(&song).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(db.hiscores().is_empty());
}

#[test]
fn test_add_song_after_loading_max_song_id() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.xml");
    write(
        &path,
        r#"<encore><songs><song id="0" title="A"/><song id="4294967295" title="X"/></songs></encore>"#,
    );

    let mut db = Database::open(&path);
    assert_eq!(db.songs().len(), 2);
    let id = db.add_song(&Song::new("", "New")).unwrap();

    assert_ne!(id, 0);
    assert_eq!(db.songs().len(), 3);
    assert_eq!(db.songs().get(0).unwrap().title, "A");
    assert_eq!(db.songs().lookup(&Song::new("", "New")), Some(id));
}

#[test]
fn test_load_rejects_songs_differing_only_in_case() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.xml");
    write(
        &path,
        r#"<encore><songs>
             <song id="1" artist="Band" title="X"/>
             <song id="2" artist="band" title="X"/>
           </songs></encore>"#,
    );

    let mut db = Database::open(&path);
    assert!(db.songs().is_empty());
    assert_eq!(db.load().unwrap_err().kind(), ErrorKind::Validation);
}
