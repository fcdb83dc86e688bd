use std::sync::Arc;

use tracing::{debug, info, warn};

use fsa_core::ports::{FileHandle, FileHandlePort, SaveFilePickerPort, WritableFileStreamPort};
use fsa_core::{
    build_accept_types, DataSource, FileSaveOptions, HostError, SaveFilePickerOptions,
    WriteSource,
};

/// Called with the freshly picked handle right after the picker returns.
pub type PickerShownCallback = Box<dyn FnOnce(&FileHandle) + Send>;

/// Input of a single save.
///
/// 单次保存操作的输入参数。
pub struct FileSaveRequest {
    pub source: DataSource,
    /// Type entries; an empty list behaves like a single default entry.
    pub options: Vec<FileSaveOptions>,
    /// Previously granted handle to reuse instead of prompting.
    pub existing_handle: Option<FileHandle>,
    /// Return the probe error instead of falling back to the picker when the
    /// existing handle is no longer usable.
    pub throw_if_existing_handle_not_good: bool,
    pub on_picker_shown: Option<PickerShownCallback>,
}

impl FileSaveRequest {
    pub fn new(source: impl Into<DataSource>) -> Self {
        Self {
            source: source.into(),
            options: Vec::new(),
            existing_handle: None,
            throw_if_existing_handle_not_good: false,
            on_picker_shown: None,
        }
    }

    pub fn with_options(mut self, options: Vec<FileSaveOptions>) -> Self {
        self.options = options;
        self
    }

    pub fn with_option(mut self, option: FileSaveOptions) -> Self {
        self.options = vec![option];
        self
    }

    pub fn with_existing_handle(mut self, handle: FileHandle) -> Self {
        self.existing_handle = Some(handle);
        self
    }

    pub fn throw_if_existing_handle_not_good(mut self, strict: bool) -> Self {
        self.throw_if_existing_handle_not_good = strict;
        self
    }

    pub fn on_picker_shown(mut self, callback: impl FnOnce(&FileHandle) + Send + 'static) -> Self {
        self.on_picker_shown = Some(Box::new(callback));
        self
    }
}

/// Use case for saving data to a user-chosen file.
///
/// Resolves a destination (reused or picked), opens a writable on it and
/// writes the source through the best path it supports.
pub struct FileSave {
    picker: Arc<dyn SaveFilePickerPort>,
}

impl FileSave {
    pub fn from_ports(picker: Arc<dyn SaveFilePickerPort>) -> Self {
        Self { picker }
    }

    /// Saves `request.source` and returns the handle it was written to.
    ///
    /// Steps, each awaited in order:
    /// 1. infer a media type from the source
    /// 2. build accept descriptors for every option
    /// 3. probe the existing handle, if any
    /// 4. reuse it, or show the picker (then call `on_picker_shown`)
    /// 5. open a writable
    /// 6. pipe the stream or body, or write the buffer once and close
    ///
    /// # Errors
    ///
    /// Host rejections (cancelled picker, denied permission, failed write)
    /// are returned as produced by the adapter. A failed probe is only
    /// returned when `throw_if_existing_handle_not_good` is set.
    #[tracing::instrument(
        name = "usecase.file_save.execute",
        skip_all,
        fields(
            write_path = ?request.source.write_path(),
            reuse = request.existing_handle.is_some(),
        )
    )]
    pub async fn execute(&self, request: FileSaveRequest) -> Result<FileHandle, HostError> {
        run(self.picker.as_ref(), request).await
    }
}

/// Convenience form of [`FileSave::execute`] for one-off calls.
pub async fn file_save(
    picker: &dyn SaveFilePickerPort,
    source: impl Into<DataSource>,
    options: Vec<FileSaveOptions>,
    existing_handle: Option<FileHandle>,
    throw_if_existing_handle_not_good: bool,
    on_picker_shown: Option<PickerShownCallback>,
) -> Result<FileHandle, HostError> {
    let request = FileSaveRequest {
        source: source.into(),
        options,
        existing_handle,
        throw_if_existing_handle_not_good,
        on_picker_shown,
    };
    run(picker, request).await
}

async fn run(
    picker: &dyn SaveFilePickerPort,
    request: FileSaveRequest,
) -> Result<FileHandle, HostError> {
    let FileSaveRequest {
        source,
        mut options,
        existing_handle,
        throw_if_existing_handle_not_good,
        on_picker_shown,
    } = request;

    if options.is_empty() {
        options.push(FileSaveOptions::default());
    }

    // 1-2. Accept descriptors
    let inferred = source.inferred_type();
    let types = build_accept_types(&options, inferred.as_ref());
    debug!(inferred = ?inferred, types = types.len(), "Built accept types");

    // 3. Probe existing handle
    let existing_handle = match existing_handle {
        Some(handle) => match handle.get_file().await {
            Ok(_) => Some(handle),
            Err(err) => {
                warn!(handle = %handle.name(), error = %err, "Existing handle is no longer usable");
                if throw_if_existing_handle_not_good {
                    return Err(err);
                }
                None
            }
        },
        None => None,
    };

    // 4. Resolve destination
    let handle = match existing_handle {
        Some(handle) => {
            debug!(handle = %handle.name(), "Reusing existing handle");
            handle
        }
        None => {
            let picker_options = SaveFilePickerOptions::from_first(&options[0], types);
            let handle = picker.show_save_file_picker(picker_options).await?;
            if let Some(callback) = on_picker_shown {
                callback(&handle);
            }
            handle
        }
    };

    // 5-6. Write
    let mut writable = handle.create_writable().await?;
    let write_source = source.into_write_source();
    debug!(path = ?write_source.path(), handle = %handle.name(), "Writing source");
    match write_source {
        WriteSource::Stream(stream) => writable.pipe_from(stream).await?,
        WriteSource::Body(body) => writable.pipe_from(body).await?,
        WriteSource::Buffer(buffer) => {
            let data = buffer.read_all().await?;
            writable.write(data).await?;
            writable.close().await?;
        }
    }

    info!(handle = %handle.name(), "Saved file");
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use fsa_core::ports::tests::mock_ports::{MockHandle, MockPicker};
    use fsa_core::ports::FileInfo;
    use fsa_core::{Blob, ByteStream, Headers, MimeType, ResponseSource};
    use futures::stream::{self, StreamExt};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        CreateWritable(String),
        Pipe(Bytes),
        Write(Bytes),
        Close,
        Abort,
    }

    type Log = Arc<Mutex<Vec<Op>>>;

    // Writable that records every call; pipes are recorded as one op.
    struct RecordingWritable {
        log: Log,
        fail_write: bool,
    }

    #[async_trait]
    impl WritableFileStreamPort for RecordingWritable {
        async fn write(&mut self, data: Bytes) -> Result<(), HostError> {
            if self.fail_write {
                return Err(HostError::NotAllowed("disk is read-only".into()));
            }
            self.log.lock().unwrap().push(Op::Write(data));
            Ok(())
        }

        async fn close(&mut self) -> Result<(), HostError> {
            self.log.lock().unwrap().push(Op::Close);
            Ok(())
        }

        async fn abort(&mut self) -> Result<(), HostError> {
            self.log.lock().unwrap().push(Op::Abort);
            Ok(())
        }

        async fn pipe_from(&mut self, mut stream: ByteStream) -> Result<(), HostError> {
            let mut piped = Vec::new();
            while let Some(chunk) = stream.next().await {
                piped.extend_from_slice(&chunk?);
            }
            self.log.lock().unwrap().push(Op::Pipe(Bytes::from(piped)));
            Ok(())
        }
    }

    struct FakeHandle {
        name: String,
        valid: bool,
        fail_write: bool,
        log: Log,
    }

    impl FakeHandle {
        fn new(name: &str, valid: bool, log: &Log) -> FileHandle {
            Arc::new(Self {
                name: name.to_string(),
                valid,
                fail_write: false,
                log: log.clone(),
            })
        }
    }

    #[async_trait]
    impl FileHandlePort for FakeHandle {
        fn name(&self) -> String {
            self.name.clone()
        }

        async fn get_file(&self) -> Result<FileInfo, HostError> {
            if !self.valid {
                return Err(HostError::not_found(self.name.clone()));
            }
            Ok(FileInfo {
                name: self.name.clone(),
                size: 0,
                last_modified: None,
            })
        }

        async fn create_writable(&self) -> Result<Box<dyn WritableFileStreamPort>, HostError> {
            self.log
                .lock()
                .unwrap()
                .push(Op::CreateWritable(self.name.clone()));
            Ok(Box::new(RecordingWritable {
                log: self.log.clone(),
                fail_write: self.fail_write,
            }))
        }
    }

    fn picker_returning(handle: FileHandle) -> MockPicker {
        let mut picker = MockPicker::new();
        picker
            .expect_show_save_file_picker()
            .times(1)
            .returning(move |_| Ok(handle.clone()));
        picker
    }

    fn capture_options(handle: FileHandle) -> (MockPicker, Arc<Mutex<Option<SaveFilePickerOptions>>>) {
        let seen = Arc::new(Mutex::new(None));
        let seen_in = seen.clone();
        let mut picker = MockPicker::new();
        picker
            .expect_show_save_file_picker()
            .times(1)
            .returning(move |options| {
                *seen_in.lock().unwrap() = Some(options);
                Ok(handle.clone())
            });
        (picker, seen)
    }

    fn ops(log: &Log) -> Vec<Op> {
        log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_blob_type_maps_to_configured_extensions() {
        let log = Log::default();
        let (picker, seen) = capture_options(FakeHandle::new("a.png", true, &log));
        let use_case = FileSave::from_ports(Arc::new(picker));

        let request = FileSaveRequest::new(Blob::with_type(vec![1u8, 2, 3], "image/png"))
            .with_option(FileSaveOptions::new().with_extensions([".png"]));
        use_case.execute(request).await.unwrap();

        let options = seen.lock().unwrap().take().unwrap();
        assert_eq!(
            options.types[0].accept.get(&MimeType::from("image/png")),
            Some(&vec![".png".to_string()])
        );
    }

    #[tokio::test]
    async fn test_untyped_source_uses_wildcard_and_defaults() {
        let log = Log::default();
        let (picker, seen) = capture_options(FakeHandle::new("Untitled", true, &log));
        let use_case = FileSave::from_ports(Arc::new(picker));

        use_case
            .execute(FileSaveRequest::new(Bytes::from_static(b"raw")))
            .await
            .unwrap();

        let options = seen.lock().unwrap().take().unwrap();
        assert_eq!(options.suggested_name, "Untitled");
        assert!(!options.exclude_accept_all_option);
        assert_eq!(options.types.len(), 1);
        assert_eq!(options.types[0].description, "Files");
        assert_eq!(
            options.types[0].accept.get(&MimeType::wildcard()),
            Some(&Vec::new())
        );
    }

    #[tokio::test]
    async fn test_only_first_option_drives_picker_fields() {
        let log = Log::default();
        let (picker, seen) = capture_options(FakeHandle::new("doc.txt", true, &log));
        let use_case = FileSave::from_ports(Arc::new(picker));

        let request = FileSaveRequest::new(Blob::new("text")).with_options(vec![
            FileSaveOptions::new()
                .with_file_name("doc.txt")
                .with_id("notes")
                .exclude_accept_all(true),
            FileSaveOptions::new()
                .with_file_name("ignored.md")
                .with_id("ignored"),
        ]);
        use_case.execute(request).await.unwrap();

        let options = seen.lock().unwrap().take().unwrap();
        assert_eq!(options.suggested_name, "doc.txt");
        assert_eq!(options.id.as_deref(), Some("notes"));
        assert!(options.exclude_accept_all_option);
        assert_eq!(options.types.len(), 2);
    }

    #[tokio::test]
    async fn test_valid_existing_handle_skips_picker() {
        let log = Log::default();
        let mut picker = MockPicker::new();
        picker.expect_show_save_file_picker().times(0);
        let use_case = FileSave::from_ports(Arc::new(picker));

        let shown = Arc::new(AtomicBool::new(false));
        let shown_in = shown.clone();
        let existing = FakeHandle::new("kept.txt", true, &log);

        let handle = use_case
            .execute(
                FileSaveRequest::new(Blob::new("again"))
                    .with_existing_handle(existing)
                    .on_picker_shown(move |_| shown_in.store(true, Ordering::SeqCst)),
            )
            .await
            .unwrap();

        assert_eq!(handle.name(), "kept.txt");
        assert!(!shown.load(Ordering::SeqCst));
        assert_eq!(ops(&log)[0], Op::CreateWritable("kept.txt".into()));
    }

    #[tokio::test]
    async fn test_stale_handle_falls_back_to_picker() {
        let log = Log::default();
        let picker = picker_returning(FakeHandle::new("fresh.txt", true, &log));
        let use_case = FileSave::from_ports(Arc::new(picker));

        let shown = Arc::new(Mutex::new(None));
        let shown_in = shown.clone();
        let handle = use_case
            .execute(
                FileSaveRequest::new(Blob::new("data"))
                    .with_existing_handle(FakeHandle::new("stale.txt", false, &log))
                    .on_picker_shown(move |h| *shown_in.lock().unwrap() = Some(h.name())),
            )
            .await
            .unwrap();

        assert_eq!(handle.name(), "fresh.txt");
        assert_eq!(shown.lock().unwrap().as_deref(), Some("fresh.txt"));
        assert_eq!(ops(&log)[0], Op::CreateWritable("fresh.txt".into()));
    }

    #[tokio::test]
    async fn test_stale_handle_is_rejected_in_strict_mode() {
        let log = Log::default();
        let mut picker = MockPicker::new();
        picker.expect_show_save_file_picker().times(0);
        let use_case = FileSave::from_ports(Arc::new(picker));

        let result = use_case
            .execute(
                FileSaveRequest::new(Blob::new("data"))
                    .with_existing_handle(FakeHandle::new("stale.txt", false, &log))
                    .throw_if_existing_handle_not_good(true),
            )
            .await;

        match result {
            Err(HostError::NotFound(name)) => assert_eq!(name, "stale.txt"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("strict check must fail"),
        }
        assert!(ops(&log).is_empty(), "nothing may be written");
    }

    #[tokio::test]
    async fn test_strict_validity_check_runs_once_and_opens_nothing() {
        let mut handle = MockHandle::new();
        handle.expect_name().return_const("moved.txt".to_string());
        handle
            .expect_get_file()
            .times(1)
            .returning(|| Err(HostError::NotAllowed("permission revoked".into())));
        handle.expect_create_writable().times(0);

        let mut picker = MockPicker::new();
        picker.expect_show_save_file_picker().times(0);
        let use_case = FileSave::from_ports(Arc::new(picker));

        let result = use_case
            .execute(
                FileSaveRequest::new(Blob::new("data"))
                    .with_existing_handle(Arc::new(handle))
                    .throw_if_existing_handle_not_good(true),
            )
            .await;

        assert!(matches!(result, Err(HostError::NotAllowed(_))));
    }

    #[tokio::test]
    async fn test_reused_mock_handle_receives_buffer() {
        let log = Log::default();
        let log_in = log.clone();
        let mut handle = MockHandle::new();
        handle.expect_name().return_const("kept.bin".to_string());
        handle.expect_get_file().times(1).returning(|| {
            Ok(FileInfo {
                name: "kept.bin".into(),
                size: 3,
                last_modified: None,
            })
        });
        handle.expect_create_writable().times(1).returning(move || {
            let writable: Box<dyn WritableFileStreamPort> = Box::new(RecordingWritable {
                log: log_in.clone(),
                fail_write: false,
            });
            Ok(writable)
        });

        let mut picker = MockPicker::new();
        picker.expect_show_save_file_picker().times(0);
        let use_case = FileSave::from_ports(Arc::new(picker));

        let saved = use_case
            .execute(
                FileSaveRequest::new(Bytes::from_static(b"new"))
                    .with_existing_handle(Arc::new(handle)),
            )
            .await
            .unwrap();

        assert_eq!(saved.name(), "kept.bin");
        assert_eq!(
            ops(&log),
            vec![Op::Write(Bytes::from_static(b"new")), Op::Close]
        );
    }

    #[tokio::test]
    async fn test_stream_source_is_piped() {
        let log = Log::default();
        let picker = picker_returning(FakeHandle::new("s.bin", true, &log));
        let use_case = FileSave::from_ports(Arc::new(picker));

        let stream: ByteStream = stream::iter(vec![
            Ok(Bytes::from_static(b"ab")),
            Ok(Bytes::from_static(b"cd")),
        ])
        .boxed();
        use_case
            .execute(FileSaveRequest::new(DataSource::Stream(stream)))
            .await
            .unwrap();

        assert_eq!(
            ops(&log),
            vec![
                Op::CreateWritable("s.bin".into()),
                Op::Pipe(Bytes::from_static(b"abcd")),
            ]
        );
    }

    #[tokio::test]
    async fn test_blob_is_piped_not_buffered() {
        let log = Log::default();
        let picker = picker_returning(FakeHandle::new("b.txt", true, &log));
        let use_case = FileSave::from_ports(Arc::new(picker));

        use_case
            .execute(FileSaveRequest::new(Blob::with_type("hello", "text/plain")))
            .await
            .unwrap();

        let recorded = ops(&log);
        assert!(recorded.contains(&Op::Pipe(Bytes::from_static(b"hello"))));
        assert!(!recorded.iter().any(|op| matches!(op, Op::Write(_))));
    }

    #[tokio::test]
    async fn test_response_body_is_piped_and_header_type_used() {
        let log = Log::default();
        let (picker, seen) = capture_options(FakeHandle::new("r.json", true, &log));
        let use_case = FileSave::from_ports(Arc::new(picker));

        let headers: Headers = [("content-type", "application/json")].into_iter().collect();
        let body: ByteStream = stream::iter(vec![Ok(Bytes::from_static(b"{}"))]).boxed();
        use_case
            .execute(FileSaveRequest::new(ResponseSource::new(headers, Some(body))))
            .await
            .unwrap();

        assert_eq!(ops(&log)[1], Op::Pipe(Bytes::from_static(b"{}")));
        let options = seen.lock().unwrap().take().unwrap();
        assert!(options.types[0]
            .accept
            .contains_key(&MimeType::from("application/json")));
    }

    #[tokio::test]
    async fn test_buffer_source_is_written_once_then_closed() {
        let log = Log::default();
        let picker = picker_returning(FakeHandle::new("buf.bin", true, &log));
        let use_case = FileSave::from_ports(Arc::new(picker));

        use_case
            .execute(FileSaveRequest::new(vec![9u8, 8, 7]))
            .await
            .unwrap();

        assert_eq!(
            ops(&log),
            vec![
                Op::CreateWritable("buf.bin".into()),
                Op::Write(Bytes::from(vec![9u8, 8, 7])),
                Op::Close,
            ]
        );
    }

    #[tokio::test]
    async fn test_pending_blob_is_awaited_and_buffered() {
        let log = Log::default();
        let (picker, seen) = capture_options(FakeHandle::new("p.txt", true, &log));
        let use_case = FileSave::from_ports(Arc::new(picker));

        let source = DataSource::pending(async { Ok(Blob::with_type("later", "text/plain")) });
        use_case.execute(FileSaveRequest::new(source)).await.unwrap();

        assert_eq!(
            ops(&log)[1..],
            [Op::Write(Bytes::from_static(b"later")), Op::Close]
        );
        // a pending blob carries no type until it resolves
        let options = seen.lock().unwrap().take().unwrap();
        assert!(options.types[0].accept.contains_key(&MimeType::wildcard()));
    }

    #[tokio::test]
    async fn test_picker_is_shown_before_writable_is_opened() {
        let log = Log::default();
        let picker = picker_returning(FakeHandle::new("order.txt", true, &log));
        let use_case = FileSave::from_ports(Arc::new(picker));

        let log_in = log.clone();
        use_case
            .execute(
                FileSaveRequest::new(Blob::new("x")).on_picker_shown(move |h| {
                    log_in.lock().unwrap().push(Op::CreateWritable(format!("shown:{}", h.name())))
                }),
            )
            .await
            .unwrap();

        let recorded = ops(&log);
        assert_eq!(recorded[0], Op::CreateWritable("shown:order.txt".into()));
        assert_eq!(recorded[1], Op::CreateWritable("order.txt".into()));
    }

    #[tokio::test]
    async fn test_picker_rejection_propagates_unchanged() {
        let mut picker = MockPicker::new();
        picker
            .expect_show_save_file_picker()
            .times(1)
            .returning(|_| Err(HostError::Aborted));
        let use_case = FileSave::from_ports(Arc::new(picker));

        let shown = Arc::new(AtomicBool::new(false));
        let shown_in = shown.clone();
        let result = use_case
            .execute(
                FileSaveRequest::new(Blob::new("x"))
                    .on_picker_shown(move |_| shown_in.store(true, Ordering::SeqCst)),
            )
            .await;

        assert!(matches!(result, Err(HostError::Aborted)));
        assert!(!shown.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_write_failure_propagates_unchanged() {
        let log = Log::default();
        let handle: FileHandle = Arc::new(FakeHandle {
            name: "ro.txt".into(),
            valid: true,
            fail_write: true,
            log: log.clone(),
        });
        let use_case = FileSave::from_ports(Arc::new(picker_returning(handle)));

        let result = use_case
            .execute(FileSaveRequest::new(Bytes::from_static(b"x")))
            .await;

        assert!(matches!(result, Err(HostError::NotAllowed(_))));
        assert!(!ops(&log).contains(&Op::Close), "close must not follow a failed write");
    }

    #[tokio::test]
    async fn test_free_function_matches_use_case() {
        let log = Log::default();
        let picker = picker_returning(FakeHandle::new("fn.txt", true, &log));

        let handle = file_save(&picker, Blob::new("x"), Vec::new(), None, false, None)
            .await
            .unwrap();

        assert_eq!(handle.name(), "fn.txt");
    }
}
