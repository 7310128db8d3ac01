use jobfit_core::config::EmbeddingConfig;
use jobfit_core::similarity::cosine_similarity;
use jobfit_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    let embedder = get_default_embedder(&EmbeddingConfig::default())?;
    let texts = vec!["reactjs".to_string(), "react".to_string(), "docker".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("B={} dim={} model={}", embs.len(), embedder.dim(), embedder.embedder_id());
    println!("sim(reactjs, react)={:.3}", cosine_similarity(&embs[0], &embs[1]));
    println!("sim(reactjs, docker)={:.3}", cosine_similarity(&embs[0], &embs[2]));
    Ok(())
}
