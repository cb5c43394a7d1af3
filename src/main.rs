use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use hjnj_board::enhance::TextPolisher;
use hjnj_board::models::{self, DEFAULT_CATEGORIES};
use hjnj_board::session::AdminCredentials;
use hjnj_board::storage::SqliteStore;
use hjnj_board::store::NoticeStore;
use hjnj_board::view::{View, ViewEvent};
use hjnj_board::{App, Error};

const DEFAULT_DB_PATH: &str = "./board.db";

type BoardApp = App<SqliteStore>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    hjnj_board::logger::init_logging();

    let db_path = env::var("BOARD_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let kv = SqliteStore::open(&db_path).context("Failed to open the board database")?;

    tracing::info!(db_path = %db_path, "Starting welfare notice board");

    let now = models::now_millis();
    let store = match NoticeStore::load(&kv, now) {
        Ok(store) => store,
        Err(err @ Error::PersistenceCorrupt { .. }) => {
            if reset_on_corrupt() {
                tracing::error!(error = %err, "Stored notices are corrupt, reseeding");
                NoticeStore::reseed(&kv, now)?
            } else {
                return Err(err).context(
                    "stored notices are unreadable; set BOARD_RESET_ON_CORRUPT=true to reseed",
                );
            }
        }
        Err(err) => return Err(err.into()),
    };

    let mut app = App::from_parts(kv, store, AdminCredentials::from_env())?;
    if let Some(user) = app.current_user() {
        tracing::info!(username = %user.username, "Restored admin session");
    }

    let polisher = match TextPolisher::from_env() {
        Ok(polisher) => Some(polisher),
        Err(err) => {
            tracing::info!(error = %err, "Text polish disabled");
            None
        }
    };

    run_loop(&mut app, polisher.as_ref()).await
}

fn reset_on_corrupt() -> bool {
    env::var("BOARD_RESET_ON_CORRUPT")
        .map(|val| val == "true")
        .unwrap_or(false)
}

async fn run_loop(app: &mut BoardApp, polisher: Option<&TextPolisher>) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    render(app);
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            render(app);
            continue;
        }
        let (cmd, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match (app.current_view(), cmd) {
            (_, "quit") | (_, "exit") => break,
            (_, "help") => {
                print_help(app.current_view());
                continue;
            }
            (_, "home") => app.dispatch(ViewEvent::GoHome),
            (_, "admin") => {
                if app.is_authenticated() {
                    app.dispatch(ViewEvent::GoAdmin);
                } else {
                    println!("请先登录 (login)");
                }
            }
            (_, "logout") => app.logout()?,
            (View::Home, "search") => app.set_search(rest),
            (View::Home, "open") => {
                let picked = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| app.visible_notices().get(i).map(|n| n.id.clone()));
                match picked {
                    Some(id) => app.open_notice(&id),
                    None => println!("无效序号"),
                }
            }
            (View::Home, "login") => app.dispatch(ViewEvent::OpenLogin),
            (View::Detail, "back") => app.dispatch(ViewEvent::Back),
            (View::Login, "user") => app.login_form_mut().username = rest.to_string(),
            (View::Login, "pass") => app.login_form_mut().password = rest.to_string(),
            (View::Login, "submit") => match app.submit_login() {
                Ok(user) => println!("欢迎，{}", user.username),
                Err(Error::InvalidCredentials) => println!("验证失败"),
                Err(err) => return Err(err.into()),
            },
            (View::Login, "cancel") => app.dispatch(ViewEvent::CancelLogin),
            (View::Admin, "new") => app.dispatch(ViewEvent::Compose),
            (View::Admin, "del") => {
                let picked = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| app.notices().get(i).map(|n| n.id.clone()));
                match picked {
                    Some(id) => {
                        app.delete_notice(&id)?;
                        println!("已删除");
                    }
                    None => println!("无效序号"),
                }
            }
            (View::Create, "title") => app.notice_form_mut().title = rest.to_string(),
            (View::Create, "content") => app.notice_form_mut().content = rest.to_string(),
            (View::Create, "category") => {
                let label = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| DEFAULT_CATEGORIES.get(i).map(|s| s.to_string()))
                    .unwrap_or_else(|| rest.to_string());
                if label.is_empty() {
                    println!("用法: category <序号|名称>");
                } else {
                    app.notice_form_mut().category = label;
                }
            }
            (View::Create, "polish") => match polisher {
                Some(polisher) => {
                    if app.polish_draft(polisher).await {
                        println!("已润色");
                    } else {
                        println!("未润色（正文为空或润色失败）");
                    }
                }
                None => println!("未配置 OPENAI_API_KEY，润色不可用"),
            },
            (View::Create, "submit") => match app.create_notice() {
                Ok(notice) => println!("已发布：{}", notice.title),
                Err(Error::EmptyTitle) => println!("标题不能为空"),
                Err(err) => return Err(err.into()),
            },
            (View::Create, "cancel") => app.dispatch(ViewEvent::CancelCompose),
            _ => println!("未知命令，输入 help 查看可用命令"),
        }

        render(app);
    }

    tracing::info!("Leaving the board");
    Ok(())
}

fn render(app: &BoardApp) {
    println!();
    match app.current_view() {
        View::Home => {
            if app.search().is_empty() {
                println!("—— 惠警暖警 ——");
            } else {
                println!("—— 惠警暖警 ——  搜索: {}", app.search());
            }
            let visible = app.visible_notices();
            if visible.is_empty() {
                println!("(暂无通知)");
            }
            for (idx, notice) in visible.iter().enumerate() {
                println!(
                    "{:>2}. [{}] {}  — {}",
                    idx + 1,
                    notice.category,
                    notice.title,
                    notice.author
                );
            }
        }
        View::Detail => match app.selected_notice() {
            Some(notice) => {
                println!("《{}》", notice.title);
                println!("{} · {}", notice.category, notice.author);
                println!("{}", notice.content);
            }
            None => println!("该通知已被删除"),
        },
        View::Login => println!("—— 后台登录 ——  user <账号> / pass <密码> / submit / cancel"),
        View::Admin => {
            println!("—— 后台管理 ——");
            for (idx, notice) in app.notices().iter().enumerate() {
                println!("{:>2}. {}  — {}", idx + 1, notice.title, notice.author);
            }
        }
        View::Create => {
            let form = app.notice_form();
            println!("—— 新建通知 ——");
            println!("标题: {}", form.title);
            println!("分类: {}", form.category);
            println!("正文: {}", form.content);
        }
    }
}

fn print_help(view: View) {
    println!("通用: home / admin / logout / help / quit");
    match view {
        View::Home => println!("首页: search <关键词> / open <序号> / login"),
        View::Detail => println!("详情: back"),
        View::Login => println!("登录: user <账号> / pass <密码> / submit / cancel"),
        View::Admin => println!("管理: new / del <序号>"),
        View::Create => {
            println!("新建: title <标题> / content <正文> / category <序号|名称> / polish / submit / cancel");
            println!("分类: {}", DEFAULT_CATEGORIES.join(" / "));
        }
    }
}
