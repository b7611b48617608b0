use std::error::Error;
use std::sync::Arc;

use tokio::runtime;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use atri_red::client::Client;
use atri_red::config::connect::{self, ConnectConfig};
use atri_red::config::log::{self, LogConfig};
use atri_red::config::service::ServiceConfig;
use atri_red::event::global_receiver;
use atri_red::global_status;
use atri_red::message::face::{FaceLookup, FaceTable};
use atri_red::service::log::init_logger;

type MainResult = Result<(), Box<dyn Error>>;

static WELCOME_INFO: &str = include_str!(concat!(env!("OUT_DIR"), "/welcome_info"));

fn main() -> MainResult {
    let log_config: LogConfig = ServiceConfig::new("log", log::DEFAULT_CONFIG).read();
    let _guards = init_logger(&log_config);

    println!("{}", WELCOME_INFO);

    let runtime = runtime::Builder::new_multi_thread()
        .thread_name("GlobalRuntime")
        .enable_all()
        .build()?;

    runtime.block_on(main0())
}

fn load_faces(config: &ConnectConfig) -> Arc<dyn FaceLookup> {
    let table = match &config.face_table {
        Some(path) => FaceTable::from_file(path).unwrap_or_else(|e| {
            error!("读取表情数据({:?})失败: {}, 使用内置表情表", path, e);
            FaceTable::builtin()
        }),
        None => FaceTable::builtin(),
    };

    Arc::new(table)
}

async fn main0() -> MainResult {
    let conf: ConnectConfig = ServiceConfig::new("connect", connect::DEFAULT_CONFIG).read();
    let faces = load_faces(&conf);

    let mut receiver = global_receiver();

    for client_conf in conf.clients.iter().cloned() {
        if !client_conf.auto_connect {
            continue;
        }

        let account = client_conf.account.clone();
        let client = match Client::new(client_conf, &conf, faces.clone()) {
            Ok(client) => client,
            Err(e) => {
                error!("创建客户端({})失败: {}", account, e);
                continue;
            }
        };

        global_status().add_client(client.clone());
        tokio::spawn(async move {
            if let Err(e) = client.start().await {
                error!("{}已停止: {}", client, e);
            }
            global_status().remove_client(client.id());
        });
    }

    if global_status().clients().is_empty() {
        warn!("没有需要连接的客户端, 请在 service/connect.toml 中配置");
    }

    info!("已启动AtriRed");

    loop {
        tokio::select! {
            event = receiver.recv() => match event {
                Ok(event) => info!("{}", event),
                Err(RecvError::Lagged(n)) => warn!("事件处理过慢, 丢弃了{}条事件", n),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping...");
                break;
            }
        }
    }

    Ok(())
}
