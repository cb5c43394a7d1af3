use hjnj_board::models::DEFAULT_AUTHOR;
use hjnj_board::session::AdminCredentials;
use hjnj_board::storage::{MemoryStore, SqliteStore};
use hjnj_board::view::{View, ViewEvent};
use hjnj_board::App;

fn creds() -> AdminCredentials {
    AdminCredentials {
        username: "admin".to_string(),
        password: "admin123".to_string(),
    }
}

#[test]
fn created_notice_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("board.db");
    let db_path = db_path.to_str().unwrap();

    {
        let kv = SqliteStore::open(db_path).unwrap();
        let mut app = App::new(kv, creds()).unwrap();
        app.login("admin", "admin123").unwrap();
        app.notice_form_mut().title = "测试".to_string();
        app.notice_form_mut().category = "生活福利".to_string();
        app.notice_form_mut().content = "面向全体民辅警".to_string();
        app.create_notice().unwrap();
        assert_eq!(app.notices().len(), 4);
    }

    // reopen the same database: collection and session both come back
    let kv = SqliteStore::open(db_path).unwrap();
    let app = App::new(kv, creds()).unwrap();
    assert_eq!(app.notices().len(), 4);
    assert_eq!(app.notices()[0].title, "测试");
    assert_eq!(app.notices()[0].category, "生活福利");
    assert_eq!(app.notices()[0].author, "管理员");
    assert!(app.is_authenticated());
}

#[test]
fn cleared_board_stays_empty_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("board.db");
    let db_path = db_path.to_str().unwrap();

    {
        let kv = SqliteStore::open(db_path).unwrap();
        let mut app = App::new(kv, creds()).unwrap();
        for id in app
            .notices()
            .iter()
            .map(|n| n.id.clone())
            .collect::<Vec<_>>()
        {
            app.delete_notice(&id).unwrap();
        }
        assert!(app.notices().is_empty());
    }

    let kv = SqliteStore::open(db_path).unwrap();
    let app = App::new(kv, creds()).unwrap();
    assert!(app.notices().is_empty());
}

#[test]
fn search_scenario_over_the_seed_set() {
    let mut app = App::new(MemoryStore::new(), creds()).unwrap();

    app.set_search("体检");
    let hits = app.visible_notices();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].content.contains("体检"));

    app.set_search("");
    let all = app.visible_notices();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[test]
fn unauthenticated_creation_falls_back_to_the_office_author() {
    let mut app = App::new(MemoryStore::new(), creds()).unwrap();
    let before = app.notices().len();
    app.notice_form_mut().title = "测试".to_string();
    app.notice_form_mut().category = "生活福利".to_string();
    let notice = app.create_notice().unwrap();
    assert_eq!(app.notices().len(), before + 1);
    assert_eq!(app.notices()[0].id, notice.id);
    assert_eq!(notice.author, DEFAULT_AUTHOR);
}

#[test]
fn admin_area_locked_after_logout_even_with_stale_history() {
    let mut app = App::new(MemoryStore::new(), creds()).unwrap();

    app.dispatch(ViewEvent::OpenLogin);
    app.login("admin", "admin123").unwrap();
    app.dispatch(ViewEvent::Compose);
    assert_eq!(app.current_view(), View::Create);

    app.logout().unwrap();
    assert_eq!(app.current_view(), View::Home);

    app.dispatch(ViewEvent::GoAdmin);
    assert_eq!(app.current_view(), View::Home);
    app.dispatch(ViewEvent::Compose);
    assert_eq!(app.current_view(), View::Home);
}
