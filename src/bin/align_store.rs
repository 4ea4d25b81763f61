use std::path::PathBuf;
use std::process::ExitCode;

use align_store::device::{best_device, CandleDeviceProbe};
use align_store::export::write_textgrid;
use align_store::{AlignmentStore, FrameScale, LoadedAlignment, TierKind};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TierChoice {
    Chars,
    #[value(name = "chars-cleaned")]
    CharsCleaned,
    Words,
    #[value(name = "words-cleaned")]
    WordsCleaned,
}

impl TierChoice {
    fn kind(self) -> TierKind {
        match self {
            Self::Chars => TierKind::Chars,
            Self::CharsCleaned => TierKind::CharsCleaned,
            Self::Words => TierKind::Words,
            Self::WordsCleaned => TierKind::WordsCleaned,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "align-store")]
#[command(about = "Inspect persisted forced-alignment records")]
struct Args {
    /// Directory the alignment records live under.
    #[arg(long, env = "ALIGN_STORE_ROOT", default_value = "alignments")]
    root: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print metadata and one tier of a record, times in seconds.
    Show {
        id: String,
        #[arg(long, value_enum, default_value_t = TierChoice::WordsCleaned)]
        tier: TierChoice,
    },
    /// List the ids of every record under the root.
    List,
    /// Export a record's cleaned tiers as a Praat TextGrid.
    Textgrid {
        id: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// Report the compute device an aligner would pick.
    Device,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), align_store::AlignmentError> {
    let store = AlignmentStore::open(&args.root);
    match args.command {
        Command::Show { id, tier } => {
            let alignment = store.read(&id)?;
            print_alignment(&alignment, tier.kind())
        }
        Command::List => {
            for id in store.ids()? {
                println!("{id}");
            }
            Ok(())
        }
        Command::Textgrid { id, out } => {
            let alignment = store.read(&id)?;
            write_textgrid(&alignment, &out)?;
            println!("{}", out.display());
            Ok(())
        }
        Command::Device => {
            println!("{}", best_device(&CandleDeviceProbe));
            Ok(())
        }
    }
}

fn print_alignment(
    alignment: &LoadedAlignment,
    kind: TierKind,
) -> Result<(), align_store::AlignmentError> {
    let meta = &alignment.meta;
    let scale = FrameScale::from_meta(meta)?;
    println!("id: {}", meta.id);
    println!("recognised: {}", meta.recognised);
    println!(
        "duration_s={:.3} model_frames={} samples={} rate_hz={} sec_per_frame={:.6} partition_score={:.4}",
        scale.duration_seconds(),
        meta.n_model_frames,
        meta.n_audio_samples,
        meta.sampling_rate,
        scale.seconds_per_model_frame(),
        meta.partition_score,
    );
    println!("{}:", kind.key());
    for segment in alignment.tiers.get(kind) {
        println!(
            "  {:>9.3} {:>9.3} {:>8.4}  {}",
            scale.frames_to_seconds(segment.start),
            scale.frames_to_seconds(segment.end),
            segment.score,
            segment.label
        );
    }
    Ok(())
}
