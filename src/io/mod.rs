mod raw_file;

pub use raw_file::{
    read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le, RawFile,
};
