use clap::Parser;
use routing_input_transformer::core::render::summary_line;
use routing_input_transformer::utils::error::ErrorSeverity;
use routing_input_transformer::utils::{logger, validation::Validate};
use routing_input_transformer::{
    CliConfig, EtlEngine, LocalStorage, Table, TomlConfig, TransformPipeline, UploadedFile,
};
use std::path::Path;

#[derive(Parser)]
#[command(name = "transform_file")]
#[command(about = "Run the groupid transformation on a local CSV/Excel file")]
struct Args {
    /// CSV or Excel file to transform
    input: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Directory the transformed workbook is written to
    #[arg(long)]
    output_path: Option<String>,

    /// File name of the transformed workbook
    #[arg(long)]
    output_file: Option<String>,

    /// Print the transformed table as CSV to stdout
    #[arg(long)]
    print_table: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> routing_input_transformer::Result<TomlConfig> {
    let cli = CliConfig {
        config: args.config.clone(),
        output_path: args.output_path.clone(),
        output_file: args.output_file.clone(),
        verbose: args.verbose,
        ..Default::default()
    };
    let config = cli.resolve()?;
    config.validate()?;
    Ok(config)
}

fn print_csv(table: &Table) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_text()))?;
    }
    writer.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let bytes = tokio::fs::read(&args.input).await?;
    let filename = Path::new(&args.input)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| args.input.clone());
    let upload = UploadedFile::from_bytes(filename, &bytes);

    let storage = LocalStorage::new(config.output.path.clone());
    let engine = EtlEngine::new(TransformPipeline::new(storage, config));

    match engine.run(&upload).await {
        Ok(report) => {
            if args.print_table {
                print_csv(&report.table)?;
            }
            let output = Path::new(engine.pipeline().storage().base_path()).join(&report.output_path);
            eprintln!("✅ {}", summary_line(&report.filename, &report.table));
            eprintln!("📁 Output saved to: {}", output.display());
        }
        Err(e) => {
            tracing::error!(
                "❌ Transformation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 4,      // 輸入檔問題
                ErrorSeverity::Medium => 2,   // 缺少欄位
                ErrorSeverity::High => 1,     // 輸出或設定錯誤
                ErrorSeverity::Critical => 3, // 系統錯誤
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
