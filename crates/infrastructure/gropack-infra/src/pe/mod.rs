//! Just enough of the PE/COFF layout to skip an executable's code section.

use byteorder::{ByteOrder, LittleEndian};

const DOS_MAGIC: &[u8; 2] = b"MZ";
const PE_MAGIC: &[u8; 4] = b"PE\0\0";
const PE_OFFSET_FIELD: usize = 0x3C;
const COFF_HEADER_LEN: usize = 20;
const SECTION_HEADER_LEN: usize = 40;
const RAW_DATA_POINTER_FIELD: usize = 20;

pub fn is_executable(data: &[u8]) -> bool {
    data.starts_with(DOS_MAGIC) && pe_header_offset(data).is_some()
}

/// File offset where the raw data of the second section starts.
///
/// The first section of an image is its code, which never holds resource
/// names. `None` if the headers do not parse or the offset is out of range.
pub fn second_section_offset(data: &[u8]) -> Option<usize> {
    let pe = pe_header_offset(data)?;
    let coff = pe + PE_MAGIC.len();

    let section_count = read_u16(data, coff + 2)? as usize;
    let optional_header_len = read_u16(data, coff + 16)? as usize;
    if section_count < 2 {
        return None;
    }

    let second = coff + COFF_HEADER_LEN + optional_header_len + SECTION_HEADER_LEN;
    let raw_data = read_u32(data, second + RAW_DATA_POINTER_FIELD)? as usize;

    (raw_data > 0 && raw_data < data.len()).then_some(raw_data)
}

fn pe_header_offset(data: &[u8]) -> Option<usize> {
    if !data.starts_with(DOS_MAGIC) {
        return None;
    }
    let pe = read_u32(data, PE_OFFSET_FIELD)? as usize;
    (data.get(pe..pe.checked_add(PE_MAGIC.len())?)? == PE_MAGIC).then_some(pe)
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    data.get(at..at.checked_add(2)?).map(LittleEndian::read_u16)
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    data.get(at..at.checked_add(4)?).map(LittleEndian::read_u32)
}
