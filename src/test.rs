//! Utilities for building synthetic GBS images in tests and
//! benchmarks.

use crate::{
    consts::DEFAULT_SAMPLE_RATE,
    gbs::{Gbs, GBS_HEADER_SIZE},
    player::Player,
};

pub struct TestOptions {
    pub song_count: u8,
    pub default_song: u8,
    pub load_addr: u16,
    pub init_addr: u16,
    pub play_addr: u16,
    pub stack_addr: u16,
    pub timer_modulo: u8,
    pub timer_control: u8,
    pub title: &'static str,
    pub body: Vec<u8>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            song_count: 1,
            default_song: 1,
            load_addr: 0x0400,
            init_addr: 0x0000,
            play_addr: 0x0000,
            stack_addr: 0xfffe,
            timer_modulo: 0x00,
            timer_control: 0x00,
            title: "",
            body: vec![],
        }
    }
}

pub fn build_gbs(options: TestOptions) -> Gbs {
    let mut data = vec![0x00; GBS_HEADER_SIZE];
    data[0..3].copy_from_slice(b"GBS");
    data[3] = 0x01;
    data[4] = options.song_count;
    data[5] = options.default_song;
    data[6..8].copy_from_slice(&options.load_addr.to_le_bytes());
    data[8..10].copy_from_slice(&options.init_addr.to_le_bytes());
    data[10..12].copy_from_slice(&options.play_addr.to_le_bytes());
    data[12..14].copy_from_slice(&options.stack_addr.to_le_bytes());
    data[14] = options.timer_modulo;
    data[15] = options.timer_control;
    data[0x10..0x10 + options.title.len()].copy_from_slice(options.title.as_bytes());
    data.extend_from_slice(&options.body);
    Gbs::from_data(&data).unwrap()
}

pub fn build_player(options: TestOptions) -> Player {
    let gbs = build_gbs(options);
    let subsong = gbs.default_song().max(1);
    let mut player = Player::new(gbs, DEFAULT_SAMPLE_RATE);
    player.load(subsong).unwrap();
    player
}
