// ==========================================
// banho-projection - 导入层 Trait
// ==========================================
// 职责: 定义文件解析与关联键提取接口（不包含实现）
// ==========================================

use crate::domain::projection::RecordKey;
use crate::domain::table::RawTable;
use crate::domain::types::{KeyMode, PlatingTypeSource, SourceRole};
use crate::importer::error::ProjectionResult;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 原始字节 → 通用表格
// 实现者: HtmlReportParser, CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件内容为 RawTable（首行为表头）
    ///
    /// # 参数
    /// - bytes: 文件原始内容
    /// - role: 报表角色（用于错误提示）
    ///
    /// # 返回
    /// - Ok(RawTable): 列名 + 数据行（已跳过完全空白的行）
    /// - Err: 格式不符 / 无表格 / 解析失败
    fn parse_bytes(&self, bytes: &[u8], role: SourceRole) -> ProjectionResult<RawTable>;
}

// ==========================================
// KeyExtractor Trait
// ==========================================
// 用途: 从原始文本派生业务键
// 实现者: KeyExtractorImpl
pub trait KeyExtractor: Send + Sync {
    /// 提取参考号
    ///
    /// # 规则
    /// - 以 " - " 分割，取第一段并 TRIM
    /// - 无分隔符 → 整个字符串（TRIM 后）
    fn extract_reference(&self, product_text: &str) -> String;

    /// 提取镀种
    ///
    /// # 参数
    /// - category: 镀种列（Categoria / Banho）的值
    /// - description: 产品描述（推断模式使用）
    /// - source: 镀种来源
    ///
    /// # 返回
    /// - Some(镀种): DirectColumn / InferredFromText
    /// - None: 不区分镀种
    fn extract_plating_type(
        &self,
        category: Option<&str>,
        description: &str,
        source: PlatingTypeSource,
    ) -> Option<String>;

    /// 组装关联键（ReferenceOnly 模式下忽略镀种）
    fn build_key(
        &self,
        reference: String,
        category: Option<&str>,
        description: &str,
        key_mode: KeyMode,
        source: PlatingTypeSource,
    ) -> RecordKey {
        let plating_type = match key_mode {
            KeyMode::ReferenceOnly => None,
            KeyMode::ReferenceAndPlatingType => {
                self.extract_plating_type(category, description, source)
            }
        };
        RecordKey::new(reference, plating_type)
    }
}
