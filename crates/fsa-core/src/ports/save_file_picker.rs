use std::sync::Arc;

use async_trait::async_trait;

use super::FileHandle;
use crate::{HostError, SaveFilePickerOptions};

/// Shows a "save file" dialog and hands back the chosen destination.
///
/// 显示保存文件对话框并返回用户选择的目标句柄。
///
/// A dismissed dialog is reported as [`HostError::Aborted`].
#[async_trait]
pub trait SaveFilePickerPort: Send + Sync {
    async fn show_save_file_picker(
        &self,
        options: SaveFilePickerOptions,
    ) -> Result<FileHandle, HostError>;
}

#[async_trait]
impl<T: SaveFilePickerPort + ?Sized> SaveFilePickerPort for Arc<T> {
    async fn show_save_file_picker(
        &self,
        options: SaveFilePickerOptions,
    ) -> Result<FileHandle, HostError> {
        (**self).show_save_file_picker(options).await
    }
}
