//! Tensor Reader

use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

/// The first 12 bytes of a tensor file are `tensor_file` followed by a NUL.
pub const EXPECTED_HEADER: [u8; 12] = *b"tensor_file\0";

/// Supported file version (major, minor).
pub const EXPECTED_VERSION: [u8; 2] = [1, 0];

/// Opens a file for reading or returns an error if unable to do so.
///
/// * `path` - The file path.
pub fn open_file(path: &str) -> Result<File, String> {
    File::open(path).map_err(|err| format!("unable to open file. {}", err))
}

/// Helpers for reading the little endian values of tensor files.
///
/// `NOTE`: This is just a convenience way to add helpers to `File`.
pub trait TensorReader {
    /// Reads the header bytes and compares them to the expected header.
    fn check_header(&mut self) -> Result<(), String>;

    /// Reads the version bytes and checks that the version is supported.
    fn check_version(&mut self) -> Result<(), String>;

    /// Reads one byte.
    fn read_byte(&mut self) -> Result<u8, String>;

    /// Reads one 16-bit unsigned value.
    fn read_le_u16(&mut self) -> Result<u16, String>;

    /// Reads one 32-bit unsigned value.
    fn read_le_u32(&mut self) -> Result<u32, String>;

    /// Reads one 64-bit unsigned value.
    fn read_le_u64(&mut self) -> Result<u64, String>;

    /// Reads the given number of bytes.
    ///
    /// * `count` - Number of bytes to read.
    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, String>;

    /// Reads the given number of bytes at an absolute position and restores
    /// the current position afterwards.
    ///
    /// * `offset` - Absolute position in the file.
    /// * `count`  - Number of bytes to read.
    fn read_bytes_at(&mut self, offset: u64, count: usize) -> Result<Vec<u8>, String>;

    /// Returns the total size of the file and rewinds to the start.
    fn file_size(&mut self) -> Result<u64, String>;
}

impl TensorReader for File {
    /// Reads the header bytes and compares them to the expected header.
    fn check_header(&mut self) -> Result<(), String> {
        let mut header = [0_u8; 12];
        self.read_exact(&mut header)
            .map_err(|err| format!("Unable to read header. {}", err))?;
        if header == EXPECTED_HEADER {
            Ok(())
        } else {
            Err(String::from("Invalid tensor file: invalid header."))
        }
    }

    /// Reads the version bytes and checks that the version is supported.
    fn check_version(&mut self) -> Result<(), String> {
        let mut version = [0_u8; 2];
        self.read_exact(&mut version)
            .map_err(|err| format!("Unable to read version. {}", err))?;
        if version == EXPECTED_VERSION {
            Ok(())
        } else {
            Err(format!(
                "Invalid tensor file: unknown file version {}.{}.",
                version[0], version[1]
            ))
        }
    }

    /// Reads one byte.
    fn read_byte(&mut self) -> Result<u8, String> {
        ReadBytesExt::read_u8(self).map_err(|err| format!("Unable to read u8. {}", err))
    }

    /// Reads one 16-bit unsigned value.
    fn read_le_u16(&mut self) -> Result<u16, String> {
        ReadBytesExt::read_u16::<LittleEndian>(self)
            .map_err(|err| format!("Unable to read u16. {}", err))
    }

    /// Reads one 32-bit unsigned value.
    fn read_le_u32(&mut self) -> Result<u32, String> {
        ReadBytesExt::read_u32::<LittleEndian>(self)
            .map_err(|err| format!("Unable to read u32. {}", err))
    }

    /// Reads one 64-bit unsigned value.
    fn read_le_u64(&mut self) -> Result<u64, String> {
        ReadBytesExt::read_u64::<LittleEndian>(self)
            .map_err(|err| format!("Unable to read u64. {}", err))
    }

    /// Reads the given number of bytes.
    ///
    /// * `count` - Number of bytes to read.
    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, String> {
        let mut buffer = vec![0_u8; count];
        self.read_exact(&mut buffer)
            .map_err(|err| format!("Unable to read {} bytes. {}", count, err))?;
        Ok(buffer)
    }

    /// Reads the given number of bytes at an absolute position and restores
    /// the current position afterwards.
    ///
    /// * `offset` - Absolute position in the file.
    /// * `count`  - Number of bytes to read.
    fn read_bytes_at(&mut self, offset: u64, count: usize) -> Result<Vec<u8>, String> {
        let cur_pos = self
            .stream_position()
            .map_err(|err| format!("Unable to tell current cursor position. {}", err))?;
        self.seek(SeekFrom::Start(offset))
            .map_err(|err| format!("Unable to seek to tensor offset. {}", err))?;
        let data = self.read_bytes(count)?;
        self.seek(SeekFrom::Start(cur_pos))
            .map_err(|err| format!("Unable to seek back to current position. {}", err))?;
        Ok(data)
    }

    /// Returns the total size of the file and rewinds to the start.
    fn file_size(&mut self) -> Result<u64, String> {
        let size = self
            .seek(SeekFrom::End(0))
            .map_err(|err| format!("Unable to seek to end of file. {}", err))?;
        self.rewind()
            .map_err(|err| format!("Unable to rewind file. {}", err))?;
        Ok(size)
    }
}
