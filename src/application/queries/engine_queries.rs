//! Engine Queries

/// 查询引擎与音色索引状态
#[derive(Debug, Clone)]
pub struct GetEngineStatus {
    /// 是否重新探测引擎可执行文件
    pub probe: bool,
}
