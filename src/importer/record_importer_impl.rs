// ==========================================
// 角色档案追踪 - 记录导入器实现
// ==========================================
// 职责: 整合导入流程，从上传文件到对账结果
// 流程: 类型准入 → 档案解析 → 解析 → 表头校验 → 标准化 → 转换 → 对账
// 红线: 任何失败都在此边界收敛为 ReconciliationOutcome
// ==========================================

use crate::auth::SessionProvider;
use crate::config::ImportConfigReader;
use crate::domain::outcome::{ImportFailure, ReconciliationOutcome};
use crate::domain::record::DomainRecord;
use crate::domain::types::RecordKind;
use crate::engine::{ReconcileOptions, ReconciliationEngine};
use crate::importer::file_parser::{CsvParser, DEFAULT_DELIMITER};
use crate::importer::header_schema;
use crate::importer::import_file::ImportFile;
use crate::importer::record_importer_trait::{FieldMapper, FileParser, RecordImporter, RowNormalizer};
use crate::importer::{FieldMapperImpl, RowNormalizerImpl};
use crate::repository::{LocalCache, RemoteStore};
use async_trait::async_trait;
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// RecordImporterImpl - 记录导入器实现
// ==========================================
pub struct RecordImporterImpl<R: ?Sized, L: ?Sized, S: ?Sized, C: ?Sized>
where
    R: RemoteStore,
    L: LocalCache,
    S: SessionProvider,
    C: ImportConfigReader,
{
    // 对账引擎（唯一写入者）
    engine: ReconciliationEngine<R, L, S>,

    // 配置读取器
    config: Arc<C>,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    row_normalizer: Box<dyn RowNormalizer>,
    field_mapper: Box<dyn FieldMapper>,
}

impl<R: ?Sized, L: ?Sized, S: ?Sized, C: ?Sized> RecordImporterImpl<R, L, S, C>
where
    R: RemoteStore,
    L: LocalCache,
    S: SessionProvider,
    C: ImportConfigReader,
{
    /// 使用默认组件（CSV 解析 / 标准化 / 字段映射）创建
    pub fn new(engine: ReconciliationEngine<R, L, S>, config: Arc<C>) -> Self {
        Self::with_components(
            engine,
            config,
            Box::new(CsvParser),
            Box::new(RowNormalizerImpl),
            Box::new(FieldMapperImpl),
        )
    }

    /// 创建导入器并指定各阶段组件
    ///
    /// # 参数
    /// - engine: 对账引擎
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - row_normalizer: 行标准化器
    /// - field_mapper: 字段映射器
    pub fn with_components(
        engine: ReconciliationEngine<R, L, S>,
        config: Arc<C>,
        file_parser: Box<dyn FileParser>,
        row_normalizer: Box<dyn RowNormalizer>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            engine,
            config,
            file_parser,
            row_normalizer,
            field_mapper,
        }
    }

    /// 读取分隔符（读取失败回落默认值）
    async fn load_delimiter(&self) -> u8 {
        match self.config.get_delimiter().await {
            Ok(delimiter) => delimiter,
            Err(e) => {
                warn!(error = %e, "分隔符配置读取失败，使用默认值");
                DEFAULT_DELIMITER
            }
        }
    }

    /// 读取对账参数（读取失败回落默认值）
    async fn load_options(&self) -> ReconcileOptions {
        let defaults = ReconcileOptions::default();

        let local_merge_mode = match self.config.get_local_merge_mode().await {
            Ok(mode) => mode,
            Err(e) => {
                warn!(error = %e, "合并模式配置读取失败，使用默认值");
                defaults.local_merge_mode
            }
        };
        let cache_namespace = match self.config.get_cache_namespace().await {
            Ok(namespace) => namespace,
            Err(e) => {
                warn!(error = %e, "缓存命名空间配置读取失败，使用默认值");
                defaults.cache_namespace
            }
        };

        ReconcileOptions {
            cache_namespace,
            local_merge_mode,
        }
    }

    /// 标准化 + 转换
    fn transform_rows(
        &self,
        header: &[String],
        rows: &[Vec<String>],
        kind: RecordKind,
    ) -> Vec<DomainRecord> {
        self.row_normalizer
            .normalize(header, rows)
            .iter()
            .map(|record| self.field_mapper.transform(record, kind))
            .collect()
    }
}

#[async_trait]
impl<R: ?Sized, L: ?Sized, S: ?Sized, C: ?Sized> RecordImporter for RecordImporterImpl<R, L, S, C>
where
    R: RemoteStore,
    L: LocalCache,
    S: SessionProvider,
    C: ImportConfigReader,
{
    #[instrument(skip_all, fields(file_name = %file.file_name, kind = %kind))]
    async fn import_file(
        &self,
        file: &ImportFile,
        kind: RecordKind,
        active_profile_id: Option<&str>,
    ) -> ReconciliationOutcome {
        // === 步骤 1: 类型准入 ===
        if !file.is_delimited_text() {
            let media_type = file.describe_media_type();
            warn!(media_type = %media_type, "文件类型不支持");
            return ReconciliationOutcome::failed(kind, ImportFailure::UnsupportedFormat { media_type });
        }

        // === 步骤 2: 档案解析（先于文件校验） ===
        let profile_id = match self.engine.resolve_profile(active_profile_id).await {
            Ok(profile_id) => profile_id,
            Err(failure) => {
                warn!(reason = %failure, "导入前置条件不满足");
                return ReconciliationOutcome::failed(kind, failure);
            }
        };

        // === 步骤 3: 解析 ===
        let delimiter = self.load_delimiter().await;
        let table = match self.file_parser.parse(&file.contents, delimiter) {
            Ok(table) => table,
            Err(e) => {
                error!(error = %e, "文件解析失败");
                return ReconciliationOutcome::failed(
                    kind,
                    ImportFailure::UnreadableFile {
                        message: e.to_string(),
                    },
                );
            }
        };

        // === 步骤 4: 空文件 ===
        if !table.has_data_rows() {
            info!(profile_id = %profile_id, "文件没有数据行，跳过写入");
            return ReconciliationOutcome::success(kind, 0);
        }

        // === 步骤 5: 表头校验 ===
        let missing = header_schema::missing_labels(&table.header, kind);
        if !missing.is_empty() {
            warn!(missing = ?missing, header = ?table.header, "表头缺少必需列");
            return ReconciliationOutcome::failed(
                kind,
                ImportFailure::SchemaMismatch {
                    expected: header_schema::expected_labels(kind),
                    missing,
                },
            );
        }

        // === 步骤 6: 标准化 + 转换 + 对账 ===
        let batch = self.transform_rows(&table.header, &table.rows, kind);
        debug!(rows = batch.len(), "行转换完成");

        let options = self.load_options().await;
        let outcome = self
            .engine
            .reconcile_for_profile(batch, kind, &profile_id, &options)
            .await
            .into_outcome();

        match &outcome.failure {
            None => info!(accepted = outcome.accepted, profile_id = %profile_id, "导入完成"),
            Some(failure) => error!(reason = %failure, profile_id = %profile_id, "导入失败"),
        }
        outcome
    }

    async fn import_from_path(
        &self,
        file_path: &Path,
        kind: RecordKind,
        active_profile_id: Option<&str>,
    ) -> ReconciliationOutcome {
        match ImportFile::from_path(file_path).await {
            Ok(file) => self.import_file(&file, kind, active_profile_id).await,
            Err(e) => {
                error!(file_path = %file_path.display(), error = %e, "文件读取失败");
                ReconciliationOutcome::failed(
                    kind,
                    ImportFailure::UnreadableFile {
                        message: e.to_string(),
                    },
                )
            }
        }
    }

    async fn batch_import(
        &self,
        files: Vec<(ImportFile, RecordKind)>,
        active_profile_id: Option<&str>,
    ) -> Vec<ReconciliationOutcome> {
        info!(count = files.len(), "开始批量导入文件");

        let import_tasks = files
            .iter()
            .map(|(file, kind)| self.import_file(file, *kind, active_profile_id));

        // 并发执行所有导入任务
        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_success()).count(),
            failed = results.iter().filter(|r| !r.is_success()).count(),
            "批量导入完成"
        );
        results
    }
}
