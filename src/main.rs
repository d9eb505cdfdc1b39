mod api;
mod config;
mod error;
mod loader;
mod models;
mod navigation;
mod ui;

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{GeoApi, IbgeClient};
use crate::config::{Config, default_config_path, load_config};
use crate::loader::Loader;
use crate::navigation::{HandoffNavigator, Navigator, write_route};
use crate::ui::{Action, App, render};

#[derive(Parser)]
#[command(name = "ecoleta")]
#[command(about = "Escolha um estado e uma cidade para encontrar pontos de coleta")]
struct Cli {
    /// Path to config file (defaults to ~/.config/ecoleta/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the IBGE localidades API
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

/// 合并配置文件与命令行参数
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli.config.clone().or_else(default_config_path);
    let mut config = match path {
        Some(path) => load_config(&path)?,
        None => Config::default(),
    };

    config.apply_overrides(cli.api_url.as_deref(), cli.timeout);
    Ok(config)
}

/// 日志写入 ~/.local/share/ecoleta/ecoleta.log，终端留给界面
fn init_logging(default_filter: &str) -> anyhow::Result<PathBuf> {
    let log_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("无法获取用户数据目录"))?
        .join("ecoleta");
    fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("ecoleta.log");
    let file = File::options().create(true).append(true).open(&log_path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(log_path)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_settings(&cli)?;
    let log_path = init_logging(&config.log_filter)?;
    tracing::info!(api = %config.api_base_url, log = %log_path.display(), "starting");

    // 网络请求在后台线程运行，界面循环保持同步
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let guard = runtime.enter();

    let api: Arc<dyn GeoApi> = Arc::new(IbgeClient::new(&config)?);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut loader = Loader::new(api, tx);
    let mut navigator = HandoffNavigator::default();
    let mut app = App::new();

    // 设置终端（界面画在 stderr 上，stdout 留给路由输出）
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(
        &mut terminal,
        &mut app,
        &mut loader,
        &mut navigator,
        &mut rx,
        config.tick_rate(),
    );

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    drop(loader);
    drop(guard);
    runtime.shutdown_background();
    result?;

    // 交给目标界面
    if let Some(route) = navigator.take() {
        write_route(&route, &mut io::stdout().lock())?;
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    app: &mut App,
    loader: &mut Loader,
    navigator: &mut dyn Navigator,
    rx: &mut UnboundedReceiver<Action>,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut effects = app.dispatch(Action::Mount);

    loop {
        if loader.run(std::mem::take(&mut effects), navigator) {
            break;
        }

        terminal.draw(|f| render(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // 原始模式下 Ctrl+C 不会产生信号
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        break;
                    }
                    effects.extend(ui::handle_key_event(app, key.code));
                }
            }
        }

        // 应用已完成的加载结果
        while let Ok(action) = rx.try_recv() {
            effects.extend(app.dispatch(action));
        }
    }
    Ok(())
}
