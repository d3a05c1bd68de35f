use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use serde::Serialize;

use product_categorizer::showcase::{find_demo_product, DEMO_PRODUCTS};
use product_categorizer::{
    check_builtin_tables, explain_text, get_all_categories, normalize, validate_image, ComparisonMetrics, DemoClassifier,
    ImageDescriptor, Modality, MultiModelClassifier, PerformanceReport, PredictionResult, ProductInput,
    RuntimeConfig,
};

#[derive(Parser)]
#[command(author, version, about = "Mock multimodal product classifier demo", long_about = None)]
struct Args {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the 27 product categories
    Categories,
    /// Classify a product from its designation and/or an image
    Predict {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long)]
        image: Option<PathBuf>,
        /// Number of ranked categories (defaults to the configured top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Run every simulated model of one modality and compare them
    Compare {
        #[arg(short, long, value_enum, default_value_t = Mode::Text)]
        mode: Mode,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Classify the built-in demo products
    Showcase {
        /// Only run the product with this name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show the demonstration performance report
    Performance {
        /// Number of best and weakest categories to list
        #[arg(short, long, default_value_t = 5)]
        top: usize,
    },
    /// Show mock token attributions for a product text
    Explain {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short = 'n', long, default_value_t = 6)]
        top_n: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Text,
    Image,
}

#[derive(Serialize)]
struct Comparison<'a> {
    modality: Modality,
    results: &'a BTreeMap<String, PredictionResult>,
    metrics: &'a ComparisonMetrics,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    check_builtin_tables().context("built-in tables are malformed")?;

    let config = RuntimeConfig::from_env().context("invalid CATEGORIZER_* configuration")?;
    info!("=== Mock Product Classifier ===");

    match args.command {
        Command::Categories => run_categories(args.json),
        Command::Predict { title, description, image, top_k } => {
            let top_k = top_k.unwrap_or(config.top_k);
            run_predict(config, title.as_deref(), &description, image.as_deref(), top_k, args.json)
        }
        Command::Compare { mode, title, description, image } => {
            run_compare(config, mode, title.as_deref(), &description, image.as_deref(), args.json)
        }
        Command::Showcase { name } => run_showcase(config, name.as_deref(), args.json),
        Command::Performance { top } => run_performance(top, args.json),
        Command::Explain { title, description, top_n } => {
            let attributions = explain_text(&normalize(&title, &description), top_n);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&attributions)?);
            } else {
                for a in attributions {
                    println!("  {:<20} {:.2}", a.token, a.weight);
                }
            }
            Ok(())
        }
    }
}

fn run_categories(json: bool) -> Result<()> {
    let categories = get_all_categories();
    if json {
        let list: Vec<_> = categories.values().collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }
    for (code, info) in categories {
        println!("{:>5}  {} {:<20} {}", code, info.glyph, info.short_name, info.full_name);
    }
    Ok(())
}

/// Reads and validates an uploaded image; file access stays in the binary
fn load_image(path: &Path, config: &RuntimeConfig) -> Result<ImageDescriptor> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let descriptor = ImageDescriptor::from_bytes(&bytes)?;
    validate_image(&descriptor, &config.image)?;

    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    if !descriptor.matches_extension(extension) {
        warn!(
            "{} looks like {} despite its extension; classifying the decoded format",
            path.display(),
            descriptor.format
        );
    }
    info!(
        "Loaded {} image {}x{} ({} bytes, sha256 {})",
        descriptor.format,
        descriptor.width,
        descriptor.height,
        descriptor.byte_len,
        descriptor.digest_hex()
    );
    Ok(descriptor)
}

/// Designation is required whenever text is used
fn product_text(title: Option<&str>, description: &str) -> Result<Option<String>> {
    match title {
        Some(title) if title.trim().is_empty() => bail!("the designation cannot be empty"),
        Some(title) => Ok(Some(normalize(title, description))),
        None => Ok(None),
    }
}

fn run_predict(
    config: RuntimeConfig,
    title: Option<&str>,
    description: &str,
    image: Option<&Path>,
    top_k: usize,
    json: bool,
) -> Result<()> {
    let image = image.map(|path| load_image(path, &config)).transpose()?;
    let text = product_text(title, description)?;
    let threshold = config.confidence_threshold;

    let classifier = DemoClassifier::new(config)?;
    let result = classifier.predict_parts(text.as_deref(), image.as_ref(), top_k)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_prediction(&result, threshold)?;
    }
    Ok(())
}

fn run_compare(
    config: RuntimeConfig,
    mode: Mode,
    title: Option<&str>,
    description: &str,
    image: Option<&Path>,
    json: bool,
) -> Result<()> {
    let image = image.map(|path| load_image(path, &config)).transpose()?;
    let classifier = MultiModelClassifier::builder()
        .with_runtime_config(config)
        .with_default_models()?
        .build()?;

    let (modality, results) = match mode {
        Mode::Text => {
            let Some(text) = product_text(title, description)? else {
                bail!("text comparison needs --title");
            };
            (Modality::Text, classifier.predict_all_text_models(&text)?)
        }
        Mode::Image => {
            let Some(image) = image else {
                bail!("image comparison needs --image");
            };
            (Modality::Image, classifier.predict_all_image_models(&image)?)
        }
    };
    let metrics = classifier.get_comparison_metrics(&results)?;

    if json {
        let comparison = Comparison { modality, results: &results, metrics: &metrics };
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    let best = classifier
        .model(&metrics.best_model)
        .map(|p| p.short_name.as_str())
        .unwrap_or(metrics.best_model.as_str());
    println!("Agreement:       {:.0}%", metrics.agreement_ratio * 100.0);
    println!("Avg confidence:  {:.1}%", metrics.avg_confidence * 100.0);
    println!("Best model:      {}", best);
    println!();
    for (rank, (model_id, confidence)) in metrics.ranking.iter().enumerate() {
        let name = classifier.model(model_id).map(|p| p.short_name.as_str()).unwrap_or(model_id.as_str());
        if let Some(result) = results.get(model_id) {
            let info = result.category.info()?;
            println!(
                "#{} {:<16} {} {:<20} {:.1}%",
                rank + 1,
                name,
                info.glyph,
                info.short_name,
                confidence * 100.0
            );
        }
    }
    Ok(())
}

fn run_showcase(config: RuntimeConfig, name: Option<&str>, json: bool) -> Result<()> {
    let products: Vec<_> = match name {
        Some(name) => match find_demo_product(name) {
            Some(product) => vec![product],
            None => bail!("no demo product named '{}'", name),
        },
        None => DEMO_PRODUCTS.iter().collect(),
    };

    let threshold = config.confidence_threshold;
    let classifier = DemoClassifier::new(config)?;
    let mut all = BTreeMap::new();
    for product in products {
        let text = product.text();
        let result = classifier.predict_default(ProductInput::Text(&text))?;
        if json {
            all.insert(product.name, result);
        } else {
            println!("\n{}: {}", product.name, text);
            print_prediction(&result, threshold)?;
        }
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
    }
    Ok(())
}

fn run_performance(top: usize, json: bool) -> Result<()> {
    let report = PerformanceReport::mock()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let g = &report.global;
    println!("Demonstration data");
    println!(
        "Accuracy {:.1}%  F1 macro {:.1}%  F1 weighted {:.1}%  Precision {:.1}%  Recall {:.1}%",
        g.accuracy * 100.0,
        g.f1_macro * 100.0,
        g.f1_weighted * 100.0,
        g.precision * 100.0,
        g.recall * 100.0
    );

    println!("\nBest categories:");
    for m in report.best_categories(top) {
        let info = m.code.info()?;
        println!("  {} {:<20} F1 {:.1}%", info.glyph, info.short_name, m.f1 * 100.0);
    }
    println!("\nCategories to improve:");
    for m in report.weakest_categories(top) {
        let info = m.code.info()?;
        println!("  {} {:<20} F1 {:.1}%", info.glyph, info.short_name, m.f1 * 100.0);
    }

    println!("\nModalities:");
    for score in report.modality_scores() {
        println!(
            "  {:<12} accuracy {:.1}%  F1 {:.1}%",
            score.modality,
            score.accuracy * 100.0,
            score.f1 * 100.0
        );
    }
    Ok(())
}

fn print_prediction(result: &PredictionResult, threshold: f32) -> Result<()> {
    let info = result.category.info()?;
    println!("  {} {} [{}]", info.glyph, info.short_name, result.category);
    println!("  {}", info.full_name);
    println!("  Confidence: {:.1}%", result.confidence * 100.0);
    for (code, score) in result.above_threshold(threshold) {
        let info = code.info()?;
        println!("    {} {:<20} {:.1}%", info.glyph, info.short_name, score * 100.0);
    }
    Ok(())
}
