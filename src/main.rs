use anyhow::{Context, Result};
use pyq_explorer::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config)
        .await
        .context("初始化失败，程序无法继续")?;
    app.run().await.context("导出失败")?;

    Ok(())
}
