// 评分引擎命令行入口
// 读取 JSON 快照（特性向量 / 葡萄园 / 财务数据），输出 JSON 评分结果

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use winemaker::core::config::{ConfigManager, ScoringConfig, DEFAULT_CONFIG_FILE};
use winemaker::core::time::GameDate;
use winemaker::finance::{evaluate_share_valuation, EconomyPhase, FinancialMetrics, ShareValuationState};
use winemaker::utils::{format_currency, format_percent, rate_for_display, LogLevel, RatingStrategy};
use winemaker::vineyard::prestige::{
    refresh_vineyard_prestige, PrestigeEvent, PrestigeFactorBreakdown, PrestigeLedger,
};
use winemaker::vineyard::quality::{
    get_vineyard_grape_quality_factors_with, get_vineyard_quality_factors_with, VineyardGrapeQuality,
    VineyardQuality,
};
use winemaker::vineyard::Vineyard;
use winemaker::wine::{
    calculate_estimated_price, evaluate_balance, Characteristic, RangeAdjustment, Rule, WineCharacteristics,
    WineQualityTier, RANGE_ADJUSTMENTS, RULES,
};

#[derive(Parser, Debug)]
#[command(name = "winemaker")]
#[command(version = winemaker::VERSION)]
#[command(about = "酒庄经营模拟评分引擎", long_about = None)]
struct Cli {
    // 配置文件路径
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    // 覆盖配置文件中的日志级别
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 计算葡萄酒平衡分
    Balance {
        /// 特性向量 JSON 文件
        #[arg(short, long, conflicts_with = "random")]
        input: Option<PathBuf>,

        /// 随机生成特性向量
        #[arg(long)]
        random: bool,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// 输出每个特性的距离明细与触发的规则
        #[arg(long)]
        breakdown: bool,

        /// 葡萄园品质分，给出时同时输出综合分与估价
        #[arg(long)]
        quality: Option<f64>,

        #[arg(long, default_value_t = 10.0)]
        base_price: f64,
    },
    /// 计算葡萄园品质因子与声望
    Vineyard {
        #[arg(short, long)]
        input: PathBuf,

        /// 只评估指定葡萄园
        #[arg(long)]
        id: Option<String>,
    },
    /// 计算下一期股价
    Share {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// 配置文件管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// 写入默认配置（已存在时不覆盖）
    Init,
    /// 打印当前配置
    Show,
    /// 校验配置文件
    Validate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<CliLogLevel> for LogLevel {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Trace => LogLevel::Trace,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Error => LogLevel::Error,
        }
    }
}

// 葡萄园快照：葡萄园列表 + 声望事件 + 当前日期
#[derive(Debug, Deserialize)]
struct VineyardSnapshot {
    vineyards: Vec<Vineyard>,
    #[serde(default)]
    events: Vec<PrestigeEvent>,
    #[serde(default = "GameDate::start")]
    date: GameDate,
}

#[derive(Debug, Serialize)]
struct VineyardReport {
    id: String,
    name: String,
    quality: VineyardQuality,
    grape_quality: VineyardGrapeQuality,
    prestige: PrestigeFactorBreakdown,
}

#[derive(Debug, Deserialize)]
struct ShareSnapshot {
    state: ShareValuationState,
    actuals: FinancialMetrics,
    expectations: FinancialMetrics,
    phase: EconomyPhase,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("运行失败: {:#}", e);
        eprintln!("错误: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // config 子命令自行处理文件，不隐式创建
    if let Commands::Config { action } = &cli.command {
        winemaker::init(cli.log_level.map(LogLevel::from).unwrap_or_default())?;
        return run_config(action, &cli.config);
    }

    let config = if cli.config.exists() {
        ScoringConfig::from_toml_str(&fs::read_to_string(&cli.config)?)
            .with_context(|| format!("加载配置失败: {}", cli.config.display()))?
    } else {
        ScoringConfig::default()
    };
    let level = cli.log_level.map(LogLevel::from).unwrap_or(config.logging.level);
    winemaker::init(level)?;

    match cli.command {
        Commands::Balance { input, random, seed, breakdown, quality, base_price } => {
            let characteristics = match (input, random) {
                (Some(path), _) => read_json::<WineCharacteristics>(&path)?,
                (None, true) => random_characteristics(seed),
                (None, false) => bail!("需要 --input 或 --random"),
            };
            run_balance(&config, &characteristics, breakdown, quality, base_price)
        }
        Commands::Vineyard { input, id } => run_vineyard(&config, &input, id.as_deref()),
        Commands::Share { input } => run_share(&config, &input),
        Commands::Config { .. } => Ok(()),
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("读取文件失败: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("解析 JSON 失败: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn random_characteristics(seed: u64) -> WineCharacteristics {
    let mut rng = StdRng::seed_from_u64(seed);
    WineCharacteristics::from_fn(|_| rng.gen_range(0.0..=1.0))
}

fn run_balance(
    config: &ScoringConfig,
    characteristics: &WineCharacteristics,
    breakdown: bool,
    quality: Option<f64>,
    base_price: f64,
) -> Result<()> {
    let rules: &[Rule] = if config.balance.apply_rules { &RULES[..] } else { &[] };
    let adjustments: &[RangeAdjustment] =
        if config.balance.apply_range_adjustments { &RANGE_ADJUSTMENTS[..] } else { &[] };
    let report = evaluate_balance(characteristics, &config.balance.base_ranges, adjustments, rules);

    info!("平衡分 {:.4}", report.score);
    for characteristic in Characteristic::ALL {
        let range = report.adjusted_ranges[characteristic];
        let display = rate_for_display(
            characteristics[characteristic],
            0.0,
            1.0,
            RatingStrategy::Balanced { range_min: range.min, range_max: range.max },
        );
        info!("  {:<10} {:.3} [{}]", characteristic.as_str(), characteristics[characteristic], display.category.label());
    }

    if let Some(quality) = quality {
        let wine_score = winemaker::wine::calculate_wine_score(quality, report.score);
        let price = calculate_estimated_price(wine_score, base_price)?;
        info!(
            "综合分 {:.4} ({}), 估价 {}",
            wine_score,
            WineQualityTier::from_score(wine_score),
            format_currency(price)
        );
    }

    if breakdown {
        print_json(&report)
    } else {
        print_json(&serde_json::json!({
            "score": report.score,
            "adjusted_ranges": report.adjusted_ranges,
        }))
    }
}

fn run_vineyard(config: &ScoringConfig, input: &Path, only: Option<&str>) -> Result<()> {
    let snapshot: VineyardSnapshot = read_json(input)?;
    let date = GameDate::new(snapshot.date.week, snapshot.date.season, snapshot.date.year)?;

    let mut ledger = PrestigeLedger::new();
    for event in snapshot.events {
        ledger.record(event)?;
    }
    let prestige = ledger.breakdown(date.absolute_week(), &snapshot.vineyards);
    info!("{} 声望合计 {:.2}", date, prestige.total());

    // 品质计算使用账本刷新后的声望因子，忽略快照中的旧值
    let mut vineyards = snapshot.vineyards;
    let factors = refresh_vineyard_prestige(&mut vineyards, &prestige, &config.prestige)?;

    let mut reports = Vec::new();
    for (vineyard, prestige_factor) in vineyards.iter().zip(factors) {
        if only.is_some_and(|id| id != vineyard.id) {
            continue;
        }
        reports.push(VineyardReport {
            id: vineyard.id.clone(),
            name: vineyard.name.clone(),
            quality: get_vineyard_quality_factors_with(vineyard, &config.quality)?,
            grape_quality: get_vineyard_grape_quality_factors_with(vineyard, &config.quality)?,
            prestige: prestige_factor,
        });
    }
    if let Some(id) = only {
        if reports.is_empty() {
            bail!("找不到葡萄园: {}", id);
        }
    }

    print_json(&reports)
}

fn run_share(config: &ScoringConfig, input: &Path) -> Result<()> {
    let snapshot: ShareSnapshot = read_json(input)?;
    let result = evaluate_share_valuation(
        &snapshot.state,
        &snapshot.actuals,
        &snapshot.expectations,
        snapshot.phase,
        &config.valuation,
    )?;
    info!(
        "股价 {} → {} (锚定偏离 {}, 阻尼 {:.3})",
        format_currency(snapshot.state.current_price),
        format_currency(result.new_price),
        format_percent(result.anchor_deviation),
        result.anchor_factor
    );
    print_json(&result)
}

fn run_config(action: &ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Init => {
            if path.exists() {
                info!("配置文件已存在: {}", path.display());
            } else {
                ConfigManager::save_config_to_file(&ScoringConfig::default(), path)?;
                info!("已写入默认配置: {}", path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let manager = ConfigManager::open(path)?;
            println!("{}", manager.config().to_toml_string()?);
            Ok(())
        }
        ConfigAction::Validate => {
            let content = fs::read_to_string(path).with_context(|| format!("读取配置失败: {}", path.display()))?;
            ScoringConfig::from_toml_str(&content)?;
            println!("配置有效: {}", path.display());
            Ok(())
        }
    }
}
