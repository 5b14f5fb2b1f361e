use tracing::info;

use crate::{
    batch::Batch,
    fetcher::ClipFetcher,
    pool::Executor,
    report::ReportWriter,
    result::Result,
    trimmer::ClipTrimmer,
    types::{ClipRecord, DownloadOutcome},
};

/// The whole run: download every clip, then trim every clip, then write the report.
///
/// Trimming only starts once every download is over.
pub struct Pipeline<'a, E> {
    pub batch: Batch<'a, E>,
    pub fetcher: ClipFetcher<'a>,
    pub trimmer: ClipTrimmer<'a>,
    pub report: &'a ReportWriter,
}

impl<E: Executor> Pipeline<'_, E> {
    pub fn run(&self, records: &[ClipRecord]) -> Result<Vec<DownloadOutcome>> {
        let outcomes = self.batch.download_all(&self.fetcher, records)?;
        self.batch.trim_all(&self.trimmer, records)?;
        self.report.write(&outcomes)?;

        info!("All tasks completed");
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, num::NonZeroUsize};

    use indoc::indoc;

    use super::*;
    use crate::{
        io::ClipLayout,
        manifest::Manifest,
        pool::WorkerPool,
        testing::{FakeDownloader, FakeTransformer},
        types::{Extension, PadFormat},
    };

    const URL_BASE: &str = "https://www.youtube.com/watch?v=";

    fn manifest() -> Manifest {
        Manifest::from_reader(
            indoc! {"
                youtube_id,time_start,time_end,label
                dQw4w9WgXcQ,10,20,dancing
                bbbbbbbbbb,0,5,singing
                aaaaaaaaaaa,3,7,cooking
            "}
            .as_bytes(),
        )
        .unwrap()
    }

    fn run(
        dir: &tempfile::TempDir,
        dl: &FakeDownloader,
        tsf: &FakeTransformer,
        records: &[ClipRecord],
    ) -> Vec<DownloadOutcome> {
        let layout = ClipLayout::new(dir.path().join("videos"), PadFormat::default(), Extension::Mp4);
        fs::create_dir_all(layout.out_dir()).unwrap();
        let report = ReportWriter::new(dir.path().join("report.json"));
        let pool = WorkerPool::Threads(NonZeroUsize::new(2).unwrap());

        let pipeline = Pipeline {
            batch: Batch::new(&pool),
            fetcher: ClipFetcher::new(dl, &layout, URL_BASE, 5),
            trimmer: ClipTrimmer::new(tsf, &layout),
            report: &report,
        };

        pipeline.run(records).unwrap()
    }

    fn videos(dir: &tempfile::TempDir) -> Vec<String> {
        let mut files: Vec<_> = fs::read_dir(dir.path().join("videos"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        files
    }

    #[test]
    fn malformed_identifier_is_reported_and_others_attempted() {
        let dir = tempfile::tempdir().unwrap();
        let dl = FakeDownloader::default();
        let tsf = FakeTransformer::default();

        let outcomes = run(&dir, &dl, &tsf, manifest().records());

        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes[0],
            DownloadOutcome::success("dQw4w9WgXcQ_000010_000020", "Downloaded")
        );
        assert_eq!(outcomes[1].clip_id, "bbbbbbbbbb_000000_000005");
        assert!(!outcomes[1].success);
        assert!(outcomes[1].message.starts_with("ValidationError"));
        assert_eq!(
            outcomes[2],
            DownloadOutcome::success("aaaaaaaaaaa_000003_000007", "Downloaded")
        );
        assert_eq!(dl.call_count(), 2);

        assert_eq!(
            videos(&dir),
            ["aaaaaaaaaaa_000003_000007_.mp4", "dQw4w9WgXcQ_000010_000020_.mp4"]
        );
        assert_eq!(tsf.call_count(), 2);

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap())
                .unwrap();
        let report = report.as_array().unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report[1]["clip_id"], "bbbbbbbbbb_000000_000005");
        assert_eq!(report[1]["success"], false);
    }

    #[test]
    fn rerun_on_completed_directory_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let records = [
            ClipRecord::new("dQw4w9WgXcQ", 10., 20.),
            ClipRecord::new("aaaaaaaaaaa", 3., 7.),
        ];

        // First run fetches and trims everything
        run(&dir, &FakeDownloader::default(), &FakeTransformer::default(), &records);
        let before: Vec<_> = videos(&dir)
            .into_iter()
            .map(|name| fs::read(dir.path().join("videos").join(&name)).unwrap())
            .collect();

        let dl = FakeDownloader::default();
        let tsf = FakeTransformer::default();
        let outcomes = run(&dir, &dl, &tsf, &records);

        assert!(outcomes.iter().all(|o| o.success && o.message == "Exists"));
        assert_eq!(dl.call_count(), 0);
        assert_eq!(tsf.call_count(), 0);

        let after: Vec<_> = videos(&dir)
            .into_iter()
            .map(|name| fs::read(dir.path().join("videos").join(&name)).unwrap())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn failed_downloads_are_not_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let dl = FakeDownloader::failing(usize::MAX);
        let tsf = FakeTransformer::default();

        let outcomes = run(&dir, &dl, &tsf, manifest().records());

        assert!(outcomes.iter().all(|o| !o.success));
        assert_eq!(outcomes[0].message, "ERROR: attempt 5 failed");
        assert_eq!(dl.call_count(), 10);
        assert_eq!(tsf.call_count(), 0);
        assert!(videos(&dir).is_empty());
    }
}
