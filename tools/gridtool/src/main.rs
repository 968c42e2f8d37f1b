use anyhow::Context as _;
use clap::Parser;
use std::io::Write;
use timegrid::{config, VariablesGrid};

#[derive(Debug, clap::Args)]
struct DumpOpt {
    /// trajectory file
    file: std::path::PathBuf,
    /// fractional digits, defaults to the shortest exact representation
    #[arg(long)]
    precision: Option<usize>,
}

#[derive(Debug, clap::Args)]
struct MergeOpt {
    a: std::path::PathBuf,
    b: std::path::PathBuf,
    /// config file to take the merge tolerance from
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    /// overrides the tolerance of the config
    #[arg(long)]
    tolerance: Option<f64>,
}

#[derive(Debug, clap::Args)]
struct AppendOpt {
    a: std::path::PathBuf,
    b: std::path::PathBuf,
    #[arg(long)]
    precision: Option<usize>,
}

#[derive(Debug, clap::Args)]
struct GenerateOpt {
    config: std::path::PathBuf,
}

#[derive(Debug, Parser)]
#[command(name = "gridtool", about = "inspect and combine trajectory files")]
enum Opt {
    /// print a trajectory file
    Dump(DumpOpt),
    /// print the merged time axis of two trajectory files
    Merge(MergeOpt),
    /// print the second trajectory appended to the first one
    Append(AppendOpt),
    /// print the trajectory a config describes
    Generate(GenerateOpt),
}

fn load(path: &std::path::Path) -> anyhow::Result<VariablesGrid> {
    VariablesGrid::from_file(path).with_context(|| format!("can't load {}", path.display()))
}

fn print(vg: &VariablesGrid, precision: Option<usize>) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    vg.write_to(&mut lock, precision)
        .context("can't write trajectory")?;
    lock.flush()?;
    Ok(())
}

fn dump(opt: &DumpOpt) -> anyhow::Result<()> {
    let vg = load(&opt.file)?;
    print(&vg, opt.precision)
}

fn merge(opt: &MergeOpt) -> anyhow::Result<()> {
    let mut cfg = match &opt.config {
        Some(path) => config::load(path).context("can't load config")?,
        None => config::Config::default(),
    };
    if let Some(tolerance) = opt.tolerance {
        cfg.merge.tolerance = tolerance;
    }

    let a = load(&opt.a)?;
    let b = load(&opt.b)?;
    let merged = cfg
        .merge_grids(a.grid(), b.grid())
        .context("can't merge grids")?;
    log::info!(
        "merged {} and {} points into {}",
        a.num_points(),
        b.num_points(),
        merged.num_points()
    );

    print!("{}", merged);
    Ok(())
}

fn append(opt: &AppendOpt) -> anyhow::Result<()> {
    let mut vg = load(&opt.a)?;
    let tail = load(&opt.b)?;
    vg.append_times(&tail)
        .context("can't append trajectories")?;
    print(&vg, opt.precision)
}

fn generate(opt: &GenerateOpt) -> anyhow::Result<()> {
    let cfg = config::load(&opt.config).context("can't load config")?;
    let vg = cfg.build().context("can't build trajectory")?;
    print(&vg, cfg.output.precision)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match &Opt::parse() {
        Opt::Dump(o) => dump(o),
        Opt::Merge(o) => merge(o),
        Opt::Append(o) => append(o),
        Opt::Generate(o) => generate(o),
    }
}
