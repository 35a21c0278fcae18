use crate::infra::load_dispatcher;
use clap::Args;
use haryali_ml::config::AppConfig;
use haryali_ml::error::AppError;
use haryali_ml::features::EncodedCategory;
use haryali_ml::serving::{PredictionDispatcher, PriceRequest};
use haryali_ml::telemetry;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Observed price per tonne
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) price_value: f64,
    /// Observation date; unparseable values are scored with zeroed date parts
    #[arg(long)]
    pub(crate) date: String,
    /// Location label; labels unknown to the encoder are scored as unseen
    #[arg(long)]
    pub(crate) location: String,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let dispatcher = cli_dispatcher()?;
    let request = PriceRequest {
        price_value: args.price_value,
        date: args.date,
        location: args.location,
    };

    for line in render_prediction(&dispatcher, &request)? {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_capabilities() -> Result<(), AppError> {
    let dispatcher = cli_dispatcher()?;
    println!("{}", serde_json::to_string_pretty(&dispatcher.capabilities())?);
    Ok(())
}

// Logs go to stderr so degraded capabilities are explained without polluting stdout.
fn cli_dispatcher() -> Result<PredictionDispatcher, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_cli(&config.telemetry)?;
    load_dispatcher(&config)
}

fn render_prediction(
    dispatcher: &PredictionDispatcher,
    request: &PriceRequest,
) -> Result<Vec<String>, AppError> {
    let features = dispatcher.price_features(request);
    let prediction = dispatcher.predict_price(request)?;

    let mut lines = vec![format!(
        "Price prediction ({} model)",
        dispatcher.registry().price_model().name()
    )];
    if features.date_parts().is_missing() {
        lines.push(format!("- date '{}' not recognised, date parts zeroed", request.date));
    }
    if features.location() == EncodedCategory::Unseen {
        lines.push(format!(
            "- location '{}' not seen in training, encoded as {}",
            request.location,
            features.location().code()
        ));
    }
    lines.push("Features:".to_string());
    for (name, value) in features.named() {
        lines.push(format!("  - {name}: {value}"));
    }
    lines.push(format!(
        "Predicted price per tonne: {:.2}",
        prediction.predicted_price_per_tonne
    ));
    Ok(lines)
}
