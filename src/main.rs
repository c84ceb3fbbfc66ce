//! March Madness matchup CLI
//!
//! Builds the matchup feature table from raw CSVs and trains/evaluates the
//! win-probability model.

use clap::{Parser, Subcommand};
use madness::{Config, Result};

#[derive(Parser)]
#[command(name = "madness")]
#[command(about = "Tournament matchup features and win prediction", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Raw data commands
    Data {
        #[command(subcommand)]
        action: DataCommands,
    },
    /// Assemble the matchup feature table
    Build {
        /// Write the table as CSV
        #[arg(long)]
        output: Option<String>,
    },
    /// Train and evaluate the model
    Train {
        /// Override model type
        #[arg(long)]
        model_type: Option<String>,
        /// Override held-out fraction
        #[arg(long)]
        test_size: Option<f64>,
        /// Random split instead of chronological
        #[arg(long)]
        random: bool,
        /// Seed for the random split
        #[arg(long)]
        seed: Option<u64>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum DataCommands {
    /// Show row and column counts of every raw table
    Status,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Data { action } => match action {
            DataCommands::Status => commands::data_status(&config),
        },
        Commands::Build { output } => commands::build(&config, output),
        Commands::Train {
            model_type,
            test_size,
            random,
            seed,
            format,
        } => {
            let mut training = config.training.clone();
            if let Some(m) = model_type {
                training.model_type = m;
            }
            if let Some(t) = test_size {
                training.test_size = t;
            }
            if random {
                training.temporal = false;
            }
            if seed.is_some() {
                training.seed = seed;
            }
            commands::train(&config, &training, format)
        }
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use madness::data::{CsvLoader, DatasetLoader};
    use madness::features::{FeatureAssembler, FeatureMatrix};
    use madness::training::MatchupModel;
    use madness::TrainingConfig;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all(&config.data.raw_data_path)?;
        println!("Created {}/", config.data.raw_data_path);

        println!("\nNext steps:");
        println!(
            "  1. Put kenpom_barttorvik.csv, resumes.csv, team_rankings.csv and tournament_matchups.csv in {}",
            config.data.raw_data_path
        );
        println!("  2. Run 'madness data status' to check the inputs");
        println!("  3. Run 'madness build --output matchups.csv' to export features");
        println!("  4. Run 'madness train' to fit and evaluate the model");

        Ok(())
    }

    pub fn data_status(config: &Config) -> Result<()> {
        let loader = CsvLoader::from_config(&config.data);
        let datasets = loader.load_all()?;

        println!("Raw Data Status");
        println!("───────────────────────────────");
        println!("  Path: {}", loader.base_dir().display());
        for (source, table) in datasets.iter() {
            println!(
                "  {:<22} {:>6} rows  {:>3} columns",
                source.to_string(),
                table.len(),
                table.columns().len()
            );
        }

        Ok(())
    }

    pub fn build(config: &Config, output: Option<String>) -> Result<()> {
        let assembler = FeatureAssembler::from_loader(&CsvLoader::from_config(&config.data))?;
        let features = assembler.create_matchup_features()?;

        let matrix = FeatureMatrix::from_matchups(&features)?;
        println!("Matchup features");
        println!("───────────────────────────────");
        println!("  Matchups:   {}", features.len());
        println!("  Columns:    {}", features.columns().len());
        println!("  Labeled:    {}", matrix.len());
        println!("  Unplayed:   {}", matrix.unlabeled);

        if let Some(path) = output {
            let file = std::fs::File::create(&path)?;
            features.write_csv(std::io::BufWriter::new(file))?;
            println!("\nWrote {}", path);
        }

        Ok(())
    }

    pub fn train(config: &Config, training: &TrainingConfig, format: OutputFormat) -> Result<()> {
        let assembler = FeatureAssembler::from_loader(&CsvLoader::from_config(&config.data))?;
        let features = assembler.create_matchup_features()?;
        let matrix = FeatureMatrix::from_matchups(&features)?;

        let mut model = MatchupModel::from_config(training);
        let split = model.split_data(
            &matrix.features,
            &matrix.labels,
            training.test_size,
            training.temporal,
            training.seed,
        )?;

        println!(
            "Training {} on {} matchups ({} features), testing on {}...",
            model.model_type(),
            split.x_train.len(),
            matrix.n_features(),
            split.x_test.len()
        );
        model.train(&split.x_train, &split.y_train)?;
        let evaluation = model.evaluate(&split.x_test, &split.y_test)?;

        match format {
            OutputFormat::Table => {
                println!("\nEvaluation");
                println!("───────────────────────────────");
                println!("  Split:    {}", if training.temporal { "temporal" } else { "random" });
                println!("  Samples:  {}", evaluation.samples);
                println!("  Accuracy: {:.1}%", evaluation.accuracy * 100.0);
                println!("  AUC:      {:.4}", evaluation.auc);
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "model_type": model.model_type(),
                    "temporal": training.temporal,
                    "test_size": training.test_size,
                    "train_samples": split.x_train.len(),
                    "evaluation": evaluation,
                });
                let text = serde_json::to_string_pretty(&json)
                    .map_err(|e| madness::MadnessError::Parse(e.to_string()))?;
                println!("{}", text);
            }
        }

        Ok(())
    }
}
