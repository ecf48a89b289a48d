use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "geprotocol",
    version,
    about = "Extract or compare parameters from GE MRI DICOM protocol data block in element (0025,101b)"
)]
pub struct Cli {
    /// TOML configuration file (defaults to $GEPROTOCOL_CONFIG when set)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Largest decompressed protocol block to accept, in bytes
    #[arg(long, global = true, value_name = "BYTES")]
    pub max_size: Option<usize>,

    /// Absolute tolerance when comparing numeric parameters
    #[arg(long, global = true, value_name = "VALUE")]
    pub tolerance: Option<f64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write protocol parameters to a JSON file
    Json {
        /// DICOM file
        #[arg(short = 'd', long = "dicom", value_name = "DICOM")]
        dicom: PathBuf,
        /// JSON file
        #[arg(short = 'j', long = "json", value_name = "JSON")]
        json: PathBuf,
    },
    /// Compare protocol parameters with a second DICOM file
    Diff {
        /// Reference DICOM file or LxProtocol file
        #[arg(short = 'r', long = "reference", value_name = "REF")]
        reference: PathBuf,
        /// Test DICOM file or LxProtocol file
        #[arg(short = 't', long = "test", value_name = "TEST")]
        test: PathBuf,
    },
}
