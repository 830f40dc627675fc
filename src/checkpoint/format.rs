/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 检查点的底层文件格式
 *
 * 数据文件（小端序）：
 *   magic(4B) | version(u32) | count(u32)
 *   重复 count 次：name_len(u32) | name | ndims(u32) | dims(u32 * ndims) | data(f32 * prod(dims))
 * 索引文件：CheckpointIndex 的 JSON 形式
 */

use super::CheckpointError;
use crate::nn::DType;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

const DATA_MAGIC: &[u8; 4] = b"SGCK";
pub(super) const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub dtype: DType,
    pub shape: Vec<usize>,
}

/// 检查点索引：数据文件中各条目的名字与形状
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointIndex {
    pub format_version: u32,
    pub entries: Vec<IndexEntry>,
}

impl CheckpointIndex {
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            entries,
        }
    }

    pub fn entry(&self, name: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn read(path: &Path) -> Result<Self, CheckpointError> {
        let text = std::fs::read_to_string(path).map_err(|e| CheckpointError::io(path, e))?;
        let index: Self = serde_json::from_str(&text)
            .map_err(|e| CheckpointError::corrupted(path, format!("索引解析失败: {e}")))?;
        if index.format_version != FORMAT_VERSION {
            return Err(CheckpointError::corrupted(
                path,
                format!("不支持的索引版本: {}", index.format_version),
            ));
        }
        Ok(index)
    }

    pub fn write(&self, path: &Path) -> Result<(), CheckpointError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::corrupted(path, format!("索引序列化失败: {e}")))?;
        std::fs::write(path, json).map_err(|e| CheckpointError::io(path, e))
    }
}

/// 按给定顺序把(名字, 数值)写入数据文件
pub(super) fn write_data(path: &Path, entries: &[(&str, &Tensor)]) -> Result<(), CheckpointError> {
    let file = File::create(path).map_err(|e| CheckpointError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut put = |bytes: &[u8]| {
        writer
            .write_all(bytes)
            .map_err(|e| CheckpointError::io(path, e))
    };

    put(DATA_MAGIC)?;
    put(&FORMAT_VERSION.to_le_bytes())?;
    put(&(entries.len() as u32).to_le_bytes())?;

    for (name, value) in entries {
        let name_bytes = name.as_bytes();
        put(&(name_bytes.len() as u32).to_le_bytes())?;
        put(name_bytes)?;

        let shape = value.shape();
        put(&(shape.len() as u32).to_le_bytes())?;
        for &dim in shape {
            put(&(dim as u32).to_le_bytes())?;
        }
        for val in value.iter() {
            put(&val.to_le_bytes())?;
        }
    }

    writer.flush().map_err(|e| CheckpointError::io(path, e))
}

/// 读取数据文件中的全部条目（保持文件中的顺序）
pub(super) fn read_data(path: &Path) -> Result<Vec<(String, Tensor)>, CheckpointError> {
    let file = File::open(path).map_err(|e| CheckpointError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    read_exact(&mut reader, &mut magic, path, "魔数")?;
    if &magic != DATA_MAGIC {
        return Err(CheckpointError::corrupted(path, "不是检查点数据文件"));
    }
    let version = read_u32(&mut reader, path, "版本")?;
    if version != FORMAT_VERSION {
        return Err(CheckpointError::corrupted(
            path,
            format!("不支持的数据文件版本: {version}"),
        ));
    }

    let count = read_u32(&mut reader, path, "条目数量")?;
    let mut entries = Vec::new();
    for _ in 0..count {
        let name_len = read_u32(&mut reader, path, "名称长度")? as usize;
        let name_bytes = read_bytes(&mut reader, name_len, path, "名称")?;
        let name = String::from_utf8(name_bytes)
            .map_err(|e| CheckpointError::corrupted(path, format!("名称编码无效: {e}")))?;

        let ndims = read_u32(&mut reader, path, "形状维度")?;
        let mut shape = Vec::new();
        for _ in 0..ndims {
            shape.push(read_u32(&mut reader, path, "形状")? as usize);
        }

        let data_len = shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| CheckpointError::corrupted(path, format!("{name}的形状过大")))?;
        let bytes = read_bytes(&mut reader, data_len, path, "数据")?;
        let data = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        let tensor = Tensor::from_vec(data, &shape)
            .map_err(|e| CheckpointError::corrupted(path, e.to_string()))?;
        entries.push((name, tensor));
    }

    Ok(entries)
}

fn read_exact<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    path: &Path,
    what: &str,
) -> Result<(), CheckpointError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => {
            CheckpointError::corrupted(path, format!("读取{what}时文件意外结束"))
        }
        _ => CheckpointError::io(path, e),
    })
}

fn read_u32<R: Read>(reader: &mut R, path: &Path, what: &str) -> Result<u32, CheckpointError> {
    let mut bytes = [0u8; 4];
    read_exact(reader, &mut bytes, path, what)?;
    Ok(u32::from_le_bytes(bytes))
}

/// 读取`len`个字节；文件不足时报损坏，不预先分配`len`大小的缓冲
fn read_bytes<R: Read>(
    reader: &mut R,
    len: usize,
    path: &Path,
    what: &str,
) -> Result<Vec<u8>, CheckpointError> {
    let mut buf = Vec::new();
    reader
        .take(len as u64)
        .read_to_end(&mut buf)
        .map_err(|e| CheckpointError::io(path, e))?;
    if buf.len() != len {
        return Err(CheckpointError::corrupted(
            path,
            format!("读取{what}时文件意外结束"),
        ));
    }
    Ok(buf)
}
