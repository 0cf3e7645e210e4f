use clap::Parser;
use rivermap::{
    RenderParams, TerrainMap, build_network, extract_polylines, refresh_tail_lengths, render_map,
    save_polylines_json, smooth_junctions,
};
use std::path::PathBuf;
use std::time::Instant;

/// Построение речной сети и отрисовка карты по классифицированному PNG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Входное изображение местности (пиксель = клетка, палитра типов)
    input: PathBuf,

    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Путь для сохранения итоговой карты
    #[arg(short, long, default_value = "rivers.png")]
    output: PathBuf,

    /// Дополнительно экспортировать ломаные в JSON
    #[arg(long)]
    export_json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let params = match &cli.config {
        Some(path) => RenderParams::from_toml_file(path.to_str().unwrap())?,
        None => RenderParams::default(),
    };

    println!("🔍 Загрузка {}...", cli.input.display());
    let img = image::open(&cli.input)?.to_rgba8();
    let terrain = TerrainMap::from_image(&img)?;

    println!(
        "Построение речной сети (размер: {}×{})...",
        terrain.width, terrain.height
    );
    let start = Instant::now();
    let mut network = build_network(&terrain)?;
    refresh_tail_lengths(&mut network.forest);
    if params.smoothing {
        smooth_junctions(&mut network.forest)?;
    }
    let polylines = extract_polylines(&mut network.forest, params.smoothing);
    println!(
        "Сеть построена за {:?}: {} деревьев, {} ломаных",
        start.elapsed(),
        network.forest.roots.len(),
        polylines.len()
    );

    let render_start = Instant::now();
    let output = render_map(&network, &polylines, terrain.width, terrain.height, &params);
    output.save(&cli.output)?;
    if let Some(path) = &cli.export_json {
        save_polylines_json(&polylines, path.to_str().unwrap())?;
    }
    println!(
        "Карта сохранена в {} за {:?}",
        cli.output.display(),
        render_start.elapsed()
    );

    Ok(())
}
