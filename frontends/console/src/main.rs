use std::{io, process::exit};

use clap::Parser;
use soundboy::{
    consts::{CPU_FREQ, DEFAULT_SAMPLE_RATE},
    gbs::Gbs,
    player::Player,
};
use soundboy_common::error::Error;

#[derive(Parser)]
#[command(name = "soundboy", about = "A Game Boy Sound (GBS) player", version)]
struct Args {
    /// Path of the GBS file to be played
    gbs: String,

    /// Subsong to play (1-based, defaults to the file's default)
    subsong: Option<u8>,

    /// Output sample rate, in Hz
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    rate: u32,

    /// Stop after the given number of seconds of emulated audio
    #[arg(long)]
    timeout: Option<u64>,
}

fn main() {
    let args = Args::parse();
    if let Err(error) = play(&args) {
        eprintln!("{}", error);
        exit(1);
    }
}

fn play(args: &Args) -> Result<(), Error> {
    let gbs = Gbs::from_file(&args.gbs)?;
    let subsong = args.subsong.unwrap_or_else(|| gbs.default_song().max(1));

    // the song banner goes to stderr, the PCM stream owns stdout
    eprintln!("Playing song {}/{}.", subsong, gbs.song_count());
    eprintln!("{}", gbs);

    let mut player = Player::new(gbs, args.rate);
    player.load(subsong)?;
    eprintln!(
        "Callback rate {:.2}Hz ({}).",
        player.cpu_i().timer_i().rate(),
        if player.gbs().custom_timer() {
            "custom"
        } else {
            "VBlank"
        }
    );

    player.attach_sink(Box::new(io::stdout()));
    let limit = args.timeout.map(|seconds| seconds * CPU_FREQ as u64);
    player.run(limit)
}
