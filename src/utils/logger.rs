// 日志系统 - 基于 log 门面与 env_logger
// RUST_LOG 优先，其次使用传入的默认级别

use std::io::Write;
use std::sync::Once;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        if cfg!(debug_assertions) { LogLevel::Debug } else { LogLevel::Info }
    }
}

static INIT: Once = Once::new();

// 重复调用安全；测试中多次初始化不会 panic
pub fn init_logger(default_level: LogLevel) {
    INIT.call_once(|| {
        let env = env_logger::Env::default()
            .default_filter_or(format!("{}={}", crate::NAME, default_level.as_str()));
        let result = env_logger::Builder::from_env(env)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{}] [{}] {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .try_init();

        if let Err(e) = result {
            eprintln!("日志系统初始化失败: {}", e);
        }
    });
}
