//! GBS (Game Boy Sound) file functions and structures.
//!
//! A GBS file is a stripped Game Boy executable: a 0x70 byte header
//! with the driver entry points followed by the code and data to be
//! loaded at the header's load address.

use std::{
    fmt::{self, Display, Formatter},
    io::Cursor,
};

use soundboy_common::{
    data::{read_bytes, read_string, read_u16, read_u8},
    error::Error,
    util::read_file,
};

pub const GBS_MAGIC: [u8; 3] = *b"GBS";
pub const GBS_VERSION: u8 = 0x01;
pub const GBS_HEADER_SIZE: usize = 0x70;

pub const ROM_BANK_SIZE: usize = 16384;

pub struct Gbs {
    /// The complete file contents, header included; the code/data
    /// body starts at [`GBS_HEADER_SIZE`].
    data: Vec<u8>,

    song_count: u8,
    default_song: u8,
    load_addr: u16,
    init_addr: u16,
    play_addr: u16,
    stack_addr: u16,
    timer_modulo: u8,
    timer_control: u8,

    title: String,
    author: String,
    copyright: String,
}

impl Gbs {
    pub fn from_data(data: &[u8]) -> Result<Self, Error> {
        if data.len() < GBS_HEADER_SIZE {
            return Err(Error::RomSize);
        }

        let mut header = Cursor::new(data);
        let magic = read_bytes::<3>(&mut header)?;
        let version = read_u8(&mut header)?;
        if magic != GBS_MAGIC || version != GBS_VERSION {
            return Err(Error::InvalidData);
        }

        let song_count = read_u8(&mut header)?;
        let default_song = read_u8(&mut header)?;
        let load_addr = read_u16(&mut header)?;
        let init_addr = read_u16(&mut header)?;
        let play_addr = read_u16(&mut header)?;
        let stack_addr = read_u16(&mut header)?;
        let timer_modulo = read_u8(&mut header)?;
        let timer_control = read_u8(&mut header)?;
        let title = read_string::<32>(&mut header)?;
        let author = read_string::<32>(&mut header)?;
        let copyright = read_string::<32>(&mut header)?;

        Ok(Self {
            data: data.to_vec(),
            song_count,
            default_song,
            load_addr,
            init_addr,
            play_addr,
            stack_addr,
            timer_modulo,
            timer_control,
            title,
            author,
            copyright,
        })
    }

    pub fn from_file(path: &str) -> Result<Self, Error> {
        let data = read_file(path)?;
        Self::from_data(&data)
    }

    /// The code/data body to be placed at the load address.
    pub fn body(&self) -> &[u8] {
        &self.data[GBS_HEADER_SIZE..]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the ROM image the driver runs in, the file footprint
    /// at the load address rounded up to a 16 KiB bank multiple.
    pub fn rom_size(&self) -> usize {
        (self.data.len() + self.load_addr as usize + ROM_BANK_SIZE - 1) & !(ROM_BANK_SIZE - 1)
    }

    pub fn rom_banks(&self) -> usize {
        self.rom_size() / ROM_BANK_SIZE
    }

    /// Whether the header requests the custom timer instead of the
    /// VBlank-synced default (bit 2 of the timer control byte).
    pub fn custom_timer(&self) -> bool {
        self.timer_control & 0x04 == 0x04
    }

    #[inline(always)]
    pub fn song_count(&self) -> u8 {
        self.song_count
    }

    #[inline(always)]
    pub fn default_song(&self) -> u8 {
        self.default_song
    }

    #[inline(always)]
    pub fn load_addr(&self) -> u16 {
        self.load_addr
    }

    #[inline(always)]
    pub fn init_addr(&self) -> u16 {
        self.init_addr
    }

    #[inline(always)]
    pub fn play_addr(&self) -> u16 {
        self.play_addr
    }

    #[inline(always)]
    pub fn stack_addr(&self) -> u16 {
        self.stack_addr
    }

    #[inline(always)]
    pub fn timer_modulo(&self) -> u8 {
        self.timer_modulo
    }

    #[inline(always)]
    pub fn timer_control(&self) -> u8 {
        self.timer_control
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn copyright(&self) -> &str {
        &self.copyright
    }

    pub fn description(&self) -> String {
        format!(
            "Title:     \"{}\"\nAuthor:    \"{}\"\nCopyright: \"{}\"\nLoad address {:04x}.\nInit address {:04x}.\nPlay address {:04x}.\nStack pointer {:04x}.\nFile size {:08x}.\nROM size {:08x} ({} banks).",
            self.title,
            self.author,
            self.copyright,
            self.load_addr,
            self.init_addr,
            self.play_addr,
            self.stack_addr,
            self.data.len(),
            self.rom_size(),
            self.rom_banks(),
        )
    }
}

impl Display for Gbs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use soundboy_common::error::Error;

    use crate::test::{build_gbs, TestOptions};

    use super::{Gbs, GBS_HEADER_SIZE};

    #[test]
    fn test_header_parsing() {
        let gbs = build_gbs(TestOptions {
            song_count: 12,
            default_song: 3,
            load_addr: 0x0400,
            init_addr: 0x0400,
            play_addr: 0x0440,
            stack_addr: 0xfffe,
            timer_modulo: 0xc0,
            timer_control: 0x05,
            title: "Test Title",
            body: vec![0xc9],
            ..Default::default()
        });

        assert_eq!(gbs.song_count(), 12);
        assert_eq!(gbs.default_song(), 3);
        assert_eq!(gbs.load_addr(), 0x0400);
        assert_eq!(gbs.init_addr(), 0x0400);
        assert_eq!(gbs.play_addr(), 0x0440);
        assert_eq!(gbs.stack_addr(), 0xfffe);
        assert_eq!(gbs.timer_modulo(), 0xc0);
        assert_eq!(gbs.timer_control(), 0x05);
        assert!(gbs.custom_timer());
        assert_eq!(gbs.title(), "Test Title");
        assert_eq!(gbs.body(), &[0xc9]);
    }

    #[test]
    fn test_bad_magic() {
        let mut data = vec![0x00; GBS_HEADER_SIZE];
        data[0..3].copy_from_slice(b"NSF");
        data[3] = 0x01;
        assert_eq!(Gbs::from_data(&data).err(), Some(Error::InvalidData));
    }

    #[test]
    fn test_bad_version() {
        let mut data = vec![0x00; GBS_HEADER_SIZE];
        data[0..3].copy_from_slice(b"GBS");
        data[3] = 0x02;
        assert!(Gbs::from_data(&data).is_err());
    }

    #[test]
    fn test_truncated_file() {
        assert!(Gbs::from_data(&[0x47, 0x42, 0x53]).is_err());
    }

    #[test]
    fn test_rom_size_rounding() {
        let gbs = build_gbs(TestOptions {
            load_addr: 0x0400,
            body: vec![0x00; 0x100],
            ..Default::default()
        });
        assert_eq!(gbs.rom_size(), 0x4000);
        assert_eq!(gbs.rom_banks(), 1);

        let gbs = build_gbs(TestOptions {
            load_addr: 0x3f00,
            body: vec![0x00; 0x1000],
            ..Default::default()
        });
        assert_eq!(gbs.rom_size(), 0x8000);
        assert_eq!(gbs.rom_banks(), 2);
    }
}
