use tracing_subscriber::EnvFilter;
use word_prediction_kb_bert::annotate::predict_words_kb_bert;
use word_prediction_kb_bert::error::Result;
use word_prediction_kb_bert::word_prediction::load_predictor;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("Loading predictor...");

    // Preload once, reuse for every document.
    let predictor = load_predictor("3")?;

    let text = "[MASK] åt glassen utanför kiosken .";
    let annotation = predictor.get_top_k_predictions(text, 5)?;

    println!("\n=== Single Text ===");
    println!("Text: \"{}\"", text);
    println!("Predictions: {}", annotation);

    println!("\n=== Sentence Annotation ===");
    let words = [
        "Han", "åt", "glassen", "utanför", "kiosken", ".", "Sedan", "gick", "han", "hem", ".",
    ];
    let sentences = [vec![0, 1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10]];

    let output = predict_words_kb_bert(&sentences, &words, "5", "3", Some(&predictor))?;

    for (word, annotation) in words.iter().zip(&output.annotations) {
        println!("{:<10} {}", word, annotation);
    }
    println!(
        "\nAnnotated {} tokens in {} sentences in {:.2}s",
        output.stats.tokens_annotated,
        output.stats.sentences,
        output.stats.total_time.as_secs_f64()
    );

    Ok(())
}
