use bundle_import_domain::{
    ImportConfig, ImportSummary, ImportTarget, ProvenanceRecord, SessionEvent, SessionState,
};
use bundle_import_ports::{
    container::{BundleWriter, ContainerSink},
    filesystem::SourceBackend,
    progress::ProgressSink,
};
use bundle_import_shared_kernel::{ApplicationError, BundleImportError, Result};
use tracing::{debug, info, warn};

use crate::{
    dto::ImportOutcome,
    prefetch::{Prepared, prepare_window},
};

/// One import run: list the source, then stream every supported file into the bundle
/// in listing order.
pub struct ImportSession<'a> {
    config: &'a ImportConfig,
    backend: &'a dyn SourceBackend,
    sink: &'a dyn ContainerSink,
    progress: Option<&'a dyn ProgressSink>,
    state: SessionState,
    summary: ImportSummary,
}

impl<'a> ImportSession<'a> {
    pub fn new(config: &'a ImportConfig, backend: &'a dyn SourceBackend, sink: &'a dyn ContainerSink) -> Self {
        Self {
            config,
            backend,
            sink,
            progress: None,
            state: SessionState::Init,
            summary: ImportSummary::default(),
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn summary(&self) -> ImportSummary {
        self.summary
    }

    /// Runs the session to a terminal state.
    ///
    /// The bundle is opened at most once and, once opened, `close` is attempted exactly
    /// once, on the abort path as well. No cleanup of a partially written bundle is done.
    pub fn run(&mut self) -> Result<ImportOutcome> {
        info!(
            root = %self.config.source_root,
            backend = %self.backend.kind(),
            destination = %self.config.destination.display(),
            overwrite = self.config.overwrite,
            "starting import"
        );

        let targets = match self.backend.list(&self.config.source_root) {
            Ok(targets) => targets,
            Err(source) => {
                self.advance(SessionEvent::Failed)?;
                return Err(ApplicationError::EnumerationFailed {
                    root: self.config.source_root.clone(),
                    source: Box::new(source),
                }
                .into());
            }
        };
        self.advance(SessionEvent::Listed)?;

        if targets.is_empty() {
            self.advance(SessionEvent::NoEntries)?;
            info!(root = %self.config.source_root, "no entries found, bundle left untouched");
            return Ok(ImportOutcome::NoEntries);
        }
        debug!(count = targets.len(), "source listed");

        let mut writer = match self.sink.open(&self.config.destination, self.config.overwrite) {
            Ok(writer) => writer,
            Err(source) => {
                self.advance(SessionEvent::Failed)?;
                return Err(ApplicationError::OpenFailed {
                    destination: self.config.destination.clone(),
                    source: Box::new(source),
                }
                .into());
            }
        };
        self.advance(SessionEvent::Opened)?;

        if let Err(err) = self.import_all(&targets, writer.as_mut()) {
            self.advance(SessionEvent::Failed)?;
            if let Err(close_err) = writer.close() {
                warn!(error = %close_err, "closing bundle after a failed import also failed");
            }
            return Err(err);
        }

        if let Err(source) = writer.close() {
            self.advance(SessionEvent::Failed)?;
            return Err(ApplicationError::CloseFailed {
                destination: self.config.destination.clone(),
                source: Box::new(source),
            }
            .into());
        }
        self.advance(SessionEvent::Closed)?;

        if let Some(progress) = self.progress
            && let Err(err) = progress.on_complete(&self.summary)
        {
            warn!(error = %err, "progress sink failed to report completion");
        }
        self.advance(SessionEvent::Reported)?;

        info!(
            accepted = self.summary.accepted,
            skipped = self.summary.skipped,
            total = self.summary.total(),
            "import finished"
        );
        Ok(ImportOutcome::Completed(self.summary))
    }

    fn import_all(&mut self, targets: &[ImportTarget], writer: &mut dyn BundleWriter) -> Result<()> {
        let window = self.config.jobs.max(1);
        for chunk in targets.chunks(window) {
            // Streams still pending in this window are dropped (and released) on early return.
            for item in prepare_window(self.backend, chunk) {
                self.commit(item, writer)?;
            }
        }
        Ok(())
    }

    fn commit(&mut self, item: Prepared<'_>, writer: &mut dyn BundleWriter) -> Result<()> {
        match item {
            Prepared::Skip(target) => {
                debug!(name = target.name(), "unsupported format, skipped");
                self.summary.record_skipped();
            }
            Prepared::Ready { target, format, stream } => {
                let mut stream = stream.map_err(|source| ApplicationError::StreamAcquisition {
                    locator: target.locator().to_string(),
                    source: Box::new(source),
                })?;
                let metadata = ProvenanceRecord::for_target(target);
                writer.append(&mut stream, format, metadata).map_err(|source| {
                    ApplicationError::AppendFailed { locator: target.locator().to_string(), source: Box::new(source) }
                })?;
                drop(stream);

                debug!(name = target.name(), %format, "appended");
                self.summary.record_accepted();
                if let Some(progress) = self.progress
                    && let Err(err) = progress.on_added(target)
                {
                    warn!(error = %err, "progress sink failed");
                }
            }
        }
        self.advance(SessionEvent::ItemProcessed)
    }

    fn advance(&mut self, event: SessionEvent) -> Result<()> {
        let next = self.state.next(event).map_err(BundleImportError::from)?;
        debug!(from = %self.state, to = %next, "session transition");
        if next.is_terminal() {
            debug!(state = %next, "session ended");
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        io::{Cursor, Read},
        path::{Path, PathBuf},
        sync::{Arc, Mutex},
    };

    use bundle_import_domain::{Backend, FormatTag};
    use bundle_import_ports::filesystem::SourceStream;
    use bundle_import_shared_kernel::InfrastructureError;

    use super::*;

    // ------------------------------------------------------------------
    // In-memory backend
    // ------------------------------------------------------------------

    #[derive(Default)]
    struct MemoryBackend {
        files: Vec<(String, Vec<u8>)>,
        unreadable: HashSet<String>,
        opened: Mutex<Vec<String>>,
    }

    impl MemoryBackend {
        fn with_files(names: &[&str]) -> Self {
            Self {
                files: names.iter().map(|n| (n.to_string(), n.as_bytes().to_vec())).collect(),
                ..Self::default()
            }
        }

        fn unreadable(mut self, name: &str) -> Self {
            self.unreadable.insert(name.to_string());
            self
        }

        fn opened(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    impl SourceBackend for MemoryBackend {
        fn kind(&self) -> Backend {
            Backend::Local
        }

        fn list(&self, root: &str) -> Result<Vec<ImportTarget>> {
            let mut targets: Vec<_> = self
                .files
                .iter()
                .map(|(name, _)| ImportTarget::new(name.clone(), format!("{root}/{name}"), Backend::Local))
                .collect();
            targets.sort();
            Ok(targets)
        }

        fn open(&self, target: &ImportTarget) -> Result<SourceStream> {
            self.opened.lock().unwrap().push(target.name().to_string());
            if self.unreadable.contains(target.name()) {
                return Err(InfrastructureError::FileRead {
                    path: PathBuf::from(target.locator()),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                }
                .into());
            }
            let bytes = self.files.iter().find(|(n, _)| n == target.name()).map(|(_, b)| b.clone()).unwrap_or_default();
            Ok(Box::new(Cursor::new(bytes)))
        }
    }

    // ------------------------------------------------------------------
    // Recording bundle writer
    // ------------------------------------------------------------------

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Open { overwrite: bool },
        Append { format: FormatTag, metadata: ProvenanceRecord, payload: Vec<u8> },
        Close,
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        calls: Arc<Mutex<Vec<Call>>>,
        exists: bool,
        reject_payload: Option<Vec<u8>>,
    }

    impl RecordingSink {
        fn existing() -> Self {
            Self { exists: true, ..Self::default() }
        }

        fn rejecting(payload: &str) -> Self {
            Self { reject_payload: Some(payload.as_bytes().to_vec()), ..Self::default() }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn appended(&self) -> Vec<(FormatTag, String)> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Append { format, metadata, .. } => Some((format, metadata.source().unwrap().to_string())),
                    _ => None,
                })
                .collect()
        }
    }

    struct RecordingWriter {
        calls: Arc<Mutex<Vec<Call>>>,
        reject_payload: Option<Vec<u8>>,
    }

    impl ContainerSink for RecordingSink {
        fn open(&self, destination: &Path, overwrite: bool) -> Result<Box<dyn BundleWriter>> {
            if self.exists && !overwrite {
                return Err(InfrastructureError::DestinationExists { path: destination.to_path_buf() }.into());
            }
            self.calls.lock().unwrap().push(Call::Open { overwrite });
            Ok(Box::new(RecordingWriter { calls: Arc::clone(&self.calls), reject_payload: self.reject_payload.clone() }))
        }
    }

    impl BundleWriter for RecordingWriter {
        fn append(&mut self, stream: &mut dyn Read, format: FormatTag, metadata: ProvenanceRecord) -> Result<()> {
            let mut payload = Vec::new();
            stream.read_to_end(&mut payload)?;
            if self.reject_payload.as_ref() == Some(&payload) {
                return Err(InfrastructureError::PayloadRejected { reason: "malformed".into() }.into());
            }
            self.calls.lock().unwrap().push(Call::Append { format, metadata, payload });
            Ok(())
        }

        fn close(self: Box<Self>) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Close);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        added: Mutex<Vec<String>>,
        completed: Mutex<Option<ImportSummary>>,
    }

    impl ProgressSink for RecordingProgress {
        fn on_added(&self, target: &ImportTarget) -> Result<()> {
            self.added.lock().unwrap().push(target.name().to_string());
            Ok(())
        }

        fn on_complete(&self, summary: &ImportSummary) -> Result<()> {
            *self.completed.lock().unwrap() = Some(*summary);
            Ok(())
        }
    }

    fn config() -> ImportConfig {
        ImportConfig::new("/in", "/out/bundle.hib")
    }

    #[test]
    fn imports_supported_files_in_byte_order() {
        let backend = MemoryBackend::with_files(&["a.png", "B.JPG", "c.txt", "readme"]);
        let sink = RecordingSink::default();
        let config = config();
        let mut session = ImportSession::new(&config, &backend, &sink);

        let outcome = session.run().expect("run succeeds");

        assert_eq!(outcome, ImportOutcome::Completed(ImportSummary { accepted: 2, skipped: 2 }));
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(
            sink.appended(),
            vec![(FormatTag::Jpeg, "/in/B.JPG".to_string()), (FormatTag::Png, "/in/a.png".to_string())]
        );
        let calls = sink.calls();
        assert_eq!(calls.first(), Some(&Call::Open { overwrite: false }));
        assert_eq!(calls.last(), Some(&Call::Close));
        assert_eq!(calls.iter().filter(|c| **c == Call::Close).count(), 1);
    }

    #[test]
    fn metadata_holds_only_the_source_locator() {
        let backend = MemoryBackend::with_files(&["scan.dcm"]);
        let sink = RecordingSink::default();
        let config = config();
        ImportSession::new(&config, &backend, &sink).run().unwrap();

        let Some(Call::Append { metadata, payload, .. }) = sink.calls().into_iter().nth(1) else {
            panic!("expected an append call");
        };
        assert_eq!(metadata.iter().count(), 1);
        assert_eq!(metadata.source(), Some("/in/scan.dcm"));
        assert_eq!(payload, b"scan.dcm");
    }

    #[test]
    fn unsupported_files_are_never_opened() {
        let backend = MemoryBackend::with_files(&["notes.txt", "x.nii", "Makefile"]);
        let sink = RecordingSink::default();
        let config = config();
        let outcome = ImportSession::new(&config, &backend, &sink).run().unwrap();

        assert_eq!(outcome.summary(), ImportSummary { accepted: 1, skipped: 2 });
        assert_eq!(backend.opened(), ["x.nii"]);
    }

    #[test]
    fn existing_destination_without_overwrite_aborts_before_any_append() {
        let backend = MemoryBackend::with_files(&["a.png"]);
        let sink = RecordingSink::existing();
        let config = config();
        let mut session = ImportSession::new(&config, &backend, &sink);

        let err = session.run().unwrap_err();

        assert!(err.is_open_conflict());
        assert!(sink.calls().is_empty());
        assert!(backend.opened().is_empty());
        assert_eq!(session.state(), SessionState::Aborted);
    }

    #[test]
    fn existing_destination_with_overwrite_is_replaced() {
        let backend = MemoryBackend::with_files(&["a.png"]);
        let sink = RecordingSink::existing();
        let config = config().with_overwrite(true);
        ImportSession::new(&config, &backend, &sink).run().unwrap();

        assert_eq!(sink.calls().first(), Some(&Call::Open { overwrite: true }));
        assert_eq!(sink.appended().len(), 1);
    }

    #[test]
    fn empty_listing_never_touches_the_writer() {
        let backend = MemoryBackend::default();
        let sink = RecordingSink::default();
        let config = config();
        let mut session = ImportSession::new(&config, &backend, &sink);

        let outcome = session.run().unwrap();

        assert_eq!(outcome, ImportOutcome::NoEntries);
        assert_eq!(outcome.summary(), ImportSummary::default());
        assert!(sink.calls().is_empty());
        assert_eq!(session.state(), SessionState::Aborted);
    }

    #[test]
    fn unreadable_source_is_fatal_and_close_is_still_attempted() {
        let backend = MemoryBackend::with_files(&["a.png", "b.png", "c.png"]).unreadable("b.png");
        let sink = RecordingSink::default();
        let config = config();
        let mut session = ImportSession::new(&config, &backend, &sink);

        let err = session.run().unwrap_err();

        assert!(matches!(
            err,
            BundleImportError::Application(ApplicationError::StreamAcquisition { ref locator, .. }) if locator == "/in/b.png"
        ));
        assert_eq!(sink.appended(), vec![(FormatTag::Png, "/in/a.png".to_string())]);
        assert_eq!(sink.calls().last(), Some(&Call::Close));
        assert_eq!(session.summary().accepted, 1);
        assert_eq!(session.state(), SessionState::Aborted);
    }

    #[test]
    fn rejected_append_stops_the_run() {
        let backend = MemoryBackend::with_files(&["1.jpg", "2.jpg", "3.jpg"]);
        let sink = RecordingSink::rejecting("2.jpg");
        let config = config();
        let err = ImportSession::new(&config, &backend, &sink).run().unwrap_err();

        assert!(matches!(err, BundleImportError::Application(ApplicationError::AppendFailed { .. })));
        assert!(matches!(
            err.root_cause(),
            BundleImportError::Infrastructure(InfrastructureError::PayloadRejected { .. })
        ));
        assert_eq!(sink.appended().len(), 1);
        assert_eq!(sink.calls().iter().filter(|c| **c == Call::Close).count(), 1);
    }

    #[test]
    fn prefetch_window_preserves_enumeration_order() {
        let names: Vec<String> = (0..40).map(|i| format!("img-{i:03}.png")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let backend = MemoryBackend::with_files(&refs);
        let sink = RecordingSink::default();
        let config = config().with_jobs(7);

        let outcome = ImportSession::new(&config, &backend, &sink).run().unwrap();

        assert_eq!(outcome.summary().accepted, 40);
        let appended: Vec<String> = sink.appended().into_iter().map(|(_, src)| src).collect();
        let expected: Vec<String> = names.iter().map(|n| format!("/in/{n}")).collect();
        assert_eq!(appended, expected);
    }

    #[test]
    fn progress_sink_sees_each_accepted_item_and_the_final_counts() {
        let backend = MemoryBackend::with_files(&["b.dcm", "a.jpeg", "skip.me"]);
        let sink = RecordingSink::default();
        let progress = RecordingProgress::default();
        let config = config();
        ImportSession::new(&config, &backend, &sink).with_progress(&progress).run().unwrap();

        assert_eq!(*progress.added.lock().unwrap(), ["a.jpeg", "b.dcm"]);
        assert_eq!(*progress.completed.lock().unwrap(), Some(ImportSummary { accepted: 2, skipped: 1 }));
    }
}
