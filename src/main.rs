// ==========================================
// 镀金属投影 - 命令行入口
// ==========================================
// 读取三份报表 → 计算送镀数量 → 打印 / 导出
// ==========================================

use anyhow::{Context, Result};
use banho_projection::config::{ConfigManager, ConfigOverrides, StrategyProfile};
use banho_projection::domain::{KeyMode, PlatingTypeSource};
use banho_projection::engine::{ProjectionFiles, ProjectionOrchestrator};
use banho_projection::export::{render_text, write_report, OutputTable, DEFAULT_FILE_NAME};
use banho_projection::logging::{self, LogFormat};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Projeção de metais para banho
#[derive(Parser, Debug)]
#[command(name = "banho-projection")]
#[command(about = "Calcula quantas peças ainda precisam ser enviadas para banho")]
#[command(version)]
struct Args {
    /// RETORNO DE BANHO (já enviado, ainda não voltou) - .xlsx/.xls/.csv
    #[arg(long, env = "BANHO_RETORNO")]
    retorno: PathBuf,

    /// PRODUÇÃO (já voltou do banho) - .xlsx/.xls/.csv
    #[arg(long, env = "BANHO_PRODUCAO")]
    producao: PathBuf,

    /// PROJEÇÃO (WM10 - .xls / HTML)
    #[arg(long, env = "BANHO_PROJECAO")]
    projecao: PathBuf,

    /// Arquivo de configuração TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Perfil: ouro, multi-banho, conferencia
    #[arg(long)]
    profile: Option<StrategyProfile>,

    /// Margem de segurança (0.3 = 30%)
    #[arg(long)]
    margin: Option<f64>,

    /// Considerar estoque atual na cobertura
    #[arg(long)]
    track_stock: Option<bool>,

    /// Chave: reference_only ou reference_and_plating_type
    #[arg(long)]
    key_mode: Option<KeyMode>,

    /// Origem do banho: direct_column, inferred_from_text ou none
    #[arg(long)]
    plating_source: Option<PlatingTypeSource>,

    /// Mantém as linhas com quantidade a enviar = 0
    #[arg(long)]
    keep_zero: bool,

    /// Exporta o resultado (.xlsx, .csv ou .json); sem valor grava projecao_banho_metais.xlsx
    #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_FILE_NAME)]
    output: Option<PathBuf>,

    /// Formato do log: text ou json
    #[arg(long, default_value = "text")]
    log_format: LogFormat,

    /// Não imprime a tabela no terminal
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            profile: self.profile,
            margin: self.margin,
            track_stock: self.track_stock,
            key_mode: self.key_mode,
            plating_type_source: self.plating_source,
            filter_zero_to_send: if self.keep_zero { Some(false) } else { None },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_format);

    info!("{} v{}", banho_projection::APP_NAME, banho_projection::VERSION);

    let manager = ConfigManager::load(args.config.as_deref())
        .context("Falha ao carregar a configuração")?;
    let config = manager.resolve(&args.overrides())?;

    let files = ProjectionFiles {
        returns: args.retorno.clone(),
        production: args.producao.clone(),
        forecast: args.projecao.clone(),
    };

    let report = ProjectionOrchestrator::new().run_files(&files, &config)?;

    if !args.quiet {
        let table = OutputTable::from_report(&report);
        if table.is_empty() {
            println!("Nenhum item precisa ser enviado para banho.");
        } else {
            println!("{}", render_text(&table));
        }
        println!();
        println!(
            "{} itens | total a enviar: {} | {} itens já cobertos",
            report.summary.output_rows, report.summary.total_to_send, report.summary.dropped_zero_rows
        );
    }

    if let Some(path) = &args.output {
        write_report(&report, path)
            .with_context(|| format!("Falha ao exportar para {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUTS: [&str; 7] = [
        "banho-projection",
        "--retorno",
        "retorno.csv",
        "--producao",
        "producao.csv",
        "--projecao",
        "projecao.xls",
    ];

    #[test]
    fn test_output_flag_without_value_uses_default_name() {
        let args = Args::try_parse_from(INPUTS.iter().copied().chain(["--output"])).unwrap();
        assert_eq!(args.output, Some(PathBuf::from(DEFAULT_FILE_NAME)));

        let args = Args::try_parse_from(INPUTS.iter().copied().chain(["-o", "saida.csv"])).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("saida.csv")));

        let args = Args::try_parse_from(INPUTS).unwrap();
        assert_eq!(args.output, None);
    }

    #[test]
    fn test_keep_zero_disables_filter() {
        let args = Args::try_parse_from(
            INPUTS
                .iter()
                .copied()
                .chain(["--keep-zero", "--profile", "multi-banho", "--margin", "0.1"]),
        )
        .unwrap();
        let overrides = args.overrides();

        assert_eq!(overrides.filter_zero_to_send, Some(false));
        assert_eq!(overrides.profile, Some(StrategyProfile::MultiBanho));
        assert_eq!(overrides.margin, Some(0.1));
    }
}
