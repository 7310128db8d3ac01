use std::fs;
use std::sync::Arc;

use jobfit_cli::sink::CsvSink;
use jobfit_cli::sources::{open_source, DirectoryJobSource, JsonlJobSource};
use jobfit_core::config::AppConfig;
use jobfit_core::traits::{JobSource, ResultSink};
use jobfit_embed::FakeEmbedder;
use jobfit_score::RelevancePipeline;

#[test]
fn jsonl_source_skips_blank_lines_and_reports_bad_ones() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("postings.jsonl");
    fs::write(
        &path,
        "{\"identifier\":\"https://jobs/1\",\"description\":\"React developer\"}\n\
         \n\
         not json\n\
         {\"identifier\":\"https://jobs/2\",\"description_text\":\"Docker and AWS\"}\n",
    )?;

    let mut source = JsonlJobSource::open(&path)?;
    assert_eq!(source.next_posting()?.map(|p| p.identifier), Some("https://jobs/1".to_string()));
    let err = source.next_posting().expect_err("line 3 is not json");
    assert!(format!("{err:#}").contains(":3"), "{err:#}");
    let second = source.next_posting()?.expect("line 4");
    assert_eq!(second.description_text, "Docker and AWS");
    assert!(source.next_posting()?.is_none());
    Ok(())
}

#[test]
fn directory_source_reads_txt_files_in_path_order() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("b.txt"), "https://jobs/b\nKubernetes platform role")?;
    fs::write(dir.path().join("a.txt"), "Frontend role with React")?;
    fs::write(dir.path().join("notes.md"), "ignored")?;

    let mut source = DirectoryJobSource::open(dir.path())?;
    let first = source.next_posting()?.expect("a.txt");
    assert!(first.identifier.ends_with("a.txt"));
    assert_eq!(first.description_text, "Frontend role with React");
    let second = source.next_posting()?.expect("b.txt");
    assert_eq!(second.identifier, "https://jobs/b");
    assert_eq!(second.description_text, "Kubernetes platform role");
    assert!(source.next_posting()?.is_none());
    Ok(())
}

#[test]
fn unsupported_source_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("postings.xml");
    fs::write(&path, "<jobs/>")?;
    assert!(open_source(&path).is_err());
    Ok(())
}

#[test]
fn csv_sink_appends_across_runs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out").join("matching_jobs.csv");
    {
        let mut sink = CsvSink::open(&path)?;
        sink.record("https://jobs/1")?;
        sink.flush()?;
    }
    {
        let mut sink = CsvSink::open(&path)?;
        sink.record("https://jobs/2?ref=a,b")?;
        sink.flush()?;
    }
    assert_eq!(fs::read_to_string(&path)?, "https://jobs/1\n\"https://jobs/2?ref=a,b\"\n");
    Ok(())
}

#[test]
fn end_to_end_run_writes_only_passing_postings() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let resume = "Frontend developer skilled in React, Redux, TypeScript, Jest and Tailwind.";
    let postings = dir.path().join("postings.jsonl");
    fs::write(
        &postings,
        format!(
            "{{\"identifier\":\"https://jobs/match\",\"description\":\"{resume}\"}}\n\
             {{\"identifier\":\"https://jobs/empty\",\"description\":\"\"}}\n"
        ),
    )?;
    let output = dir.path().join("matching_jobs.csv");

    let pipeline = RelevancePipeline::from_config(&AppConfig::default(), Arc::new(FakeEmbedder::new(384)), resume)?;
    let mut source = open_source(&postings)?;
    let mut sink = CsvSink::open(&output)?;
    let summary = pipeline.run(source.as_mut(), &mut sink)?;

    assert_eq!(summary.evaluated, 2);
    assert_eq!(summary.passed, 1);
    assert_eq!(fs::read_to_string(&output)?, "https://jobs/match\n");
    Ok(())
}
