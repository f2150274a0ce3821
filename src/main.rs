// ==========================================
// 楼层配置中心 - 命令行入口
// ==========================================
// 用法: floor-config [channel] [segment] [--active-only] [--at "YYYY-MM-DD HH:MM:SS"]
// 输出: 渠道预览 JSON (stdout), 日志写 stderr
// ==========================================

use anyhow::{anyhow, bail, Context};
use floor_config::api::{PreviewContext, PreviewFloor};
use floor_config::app::{get_default_db_path, AppState};
use floor_config::domain::options::channel_label;
use floor_config::{Channel, CustomerSegment};
use serde::Serialize;

#[derive(Serialize)]
struct PreviewOutput<'a> {
    channel: Channel,
    channel_label: String,
    segment: CustomerSegment,
    floors: &'a [PreviewFloor],
}

struct CliArgs {
    channel: Channel,
    ctx: PreviewContext,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<CliArgs> {
    let mut positional = Vec::new();
    let mut ctx = PreviewContext::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--active-only" => ctx.active_only = true,
            "--at" => {
                let at = args.next().ok_or_else(|| anyhow!("--at 缺少时间参数"))?;
                ctx.at = Some(at);
            }
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            _ => positional.push(arg),
        }
    }

    let channel = match positional.first() {
        Some(raw) => Channel::parse(raw).ok_or_else(|| anyhow!("未知渠道: {}", raw))?,
        None => Channel::Mobile,
    };
    if let Some(raw) = positional.get(1) {
        ctx.segment = CustomerSegment::parse(raw).ok_or_else(|| anyhow!("未知客群: {}", raw))?;
    }

    Ok(CliArgs { channel, ctx })
}

fn main() -> anyhow::Result<()> {
    // FLOOR_CONFIG_LOG_FORMAT=json 时输出 JSON 行日志
    match std::env::var("FLOOR_CONFIG_LOG_FORMAT").as_deref() {
        Ok("json") => floor_config::logging::init_json(),
        _ => floor_config::logging::init(),
    }

    tracing::info!("{} v{}", floor_config::APP_NAME, floor_config::VERSION);

    let cli = parse_args(std::env::args().skip(1))?;

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let preview = app_state
        .floor_api
        .preview(cli.channel, &cli.ctx)
        .context("生成预览失败")?;

    let output = PreviewOutput {
        channel: cli.channel,
        channel_label: channel_label(cli.channel),
        segment: cli.ctx.segment,
        floors: &preview,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
