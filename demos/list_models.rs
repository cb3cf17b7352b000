use futures_util::TryStreamExt;
use gemini_model_check::{models::*, Credentials};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load GEMINI_API_KEY from .env if present
    dotenvy::dotenv().ok();
    let credentials = Credentials::from_env().ok_or("GEMINI_API_KEY is not set")?;

    // List every model, across all pages
    println!("Listing all available models:");
    let models: Vec<Model> = ModelList::stream(Some(credentials.clone()), Some(50))
        .try_collect()
        .await?;

    println!("Available models:");
    for model in &models {
        let display_name = model.display_name.as_deref().unwrap_or("-");
        println!(
            "- {} ({}) [{}]",
            display_name,
            model.name,
            model.supported_generation_methods.join(", ")
        );
    }

    // Get details for the first model that can generate content
    if let Some(first_model) = models.iter().find(|m| m.supports_generate_content()) {
        println!("\nGetting details for model: {}", first_model.name);
        let model_details = Model::builder(&first_model.name)
            .credentials(credentials)
            .create()
            .await?;

        println!("Model details:");
        println!("  Name: {}", model_details.name);
        if let Some(version) = &model_details.version {
            println!("  Version: {version}");
        }
        if let Some(limit) = model_details.input_token_limit {
            println!("  Input token limit: {limit}");
        }
        if let Some(limit) = model_details.output_token_limit {
            println!("  Output token limit: {limit}");
        }
    }

    Ok(())
}
