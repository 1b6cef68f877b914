#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use jsonseq::{
        event_stream, read_stream, write_values, Anomaly, AnomalyKind, Delimiters, FrameReader,
        FrameWriter, FramingConfig, ReadEvent,
    };
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;
    use tracing_subscriber::EnvFilter;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct LogLine {
        level: String,
        message: String,
        seq: u64,
    }

    #[tokio::test]
    async fn test_file_round_trip() -> anyhow::Result<()> {
        init_tracing();
        let temp = TempDir::new()?;
        let path = temp.path().join("records.json-seq");

        let lines: Vec<LogLine> = (0..500)
            .map(|seq| LogLine {
                level: if seq % 3 == 0 { "warn" } else { "info" }.to_string(),
                message: format!("line {} with a newline\nand \u{1e} separator", seq),
                seq,
            })
            .collect();

        let mut file = tokio::fs::File::create(&path).await?;
        let mut writer = FrameWriter::default();
        let written = write_values(&mut file, &mut writer, &lines).await?;
        assert_eq!(written.records, 500);
        drop(file);

        let mut file = tokio::fs::File::open(&path).await?;
        let mut reader = FrameReader::<LogLine>::default();
        let mut read_back = Vec::new();
        let stats = read_stream(&mut file, &mut reader, |event| {
            match event {
                ReadEvent::Value(line) => read_back.push(line),
                ReadEvent::Anomaly(a) => anyhow::bail!("Unexpected anomaly: {:?}", a),
            }
            Ok(())
        })
        .await?;

        assert_eq!(read_back, lines);
        assert_eq!(stats.records, 500);
        assert_eq!(stats.bytes_in, written.bytes_out);
        assert!(!reader.has_pending());
        Ok(())
    }

    #[tokio::test]
    async fn test_small_pipe_chunks() -> anyhow::Result<()> {
        init_tracing();
        // A 5-byte pipe forces records to arrive split at arbitrary points.
        let (mut tx, rx) = tokio::io::duplex(5);

        let producer = tokio::spawn(async move {
            tx.write_all(b"preamble\n").await?;
            tx.write_all("\u{1e}{\"name\":\"Zoë\",\"tags\":[\"α\",\"β\"]}\n".as_bytes())
                .await?;
            tx.write_all(b"\x1e{\"cut\":").await?;
            tx.write_all(b"\x1enot json\n").await?;
            tx.write_all(b"\x1e42\n").await?;
            tx.shutdown().await?;
            anyhow::Ok(())
        });

        let events: Vec<ReadEvent<Value>> = event_stream(rx, FrameReader::default())
            .map(|e| e.unwrap())
            .collect()
            .await;
        producer.await??;

        assert_eq!(
            events,
            vec![
                ReadEvent::Value(json!({"name": "Zoë", "tags": ["α", "β"]})),
                ReadEvent::Anomaly(Anomaly::truncated("{\"cut\":")),
                ReadEvent::Anomaly(Anomaly::invalid("not json")),
                ReadEvent::Value(json!(42)),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_anomaly_observer_across_reads() -> anyhow::Result<()> {
        let kinds = Arc::new(Mutex::new(Vec::new()));
        let mut reader = FrameReader::<Value>::default();
        let observed = Arc::clone(&kinds);
        reader.on_anomaly(move |a| observed.lock().unwrap().push(a.kind));

        let mut input: &[u8] = b"\x1e\x1e\n\x1e[1]\n\x1e{";
        let mut values = Vec::new();
        read_stream(&mut input, &mut reader, |event| {
            if let Some(v) = event.into_value() {
                values.push(v);
            }
            Ok(())
        })
        .await?;

        assert_eq!(values, vec![json!([1])]);
        assert_eq!(
            *kinds.lock().unwrap(),
            vec![AnomalyKind::Truncated, AnomalyKind::Invalid]
        );
        // Unterminated record stays with the reader.
        assert!(reader.has_pending());
        assert_eq!(reader.pending_len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_configured_pipeline() -> anyhow::Result<()> {
        let config = FramingConfig::from_toml_str("charCodeStart = 2\ncharCodeEnd = 3\n")?;
        let mut writer = FrameWriter::from_config(&config)?;
        let mut reader = FrameReader::<Value>::from_config(&config)?;
        assert_eq!(writer.delimiters(), Delimiters::new(2, 3)?);

        let mut wire = Vec::new();
        write_values(&mut wire, &mut writer, [json!("a\nb"), json!({"k": null})]).await?;
        assert_eq!(wire[0], 2);
        assert_eq!(*wire.last().unwrap(), 3);

        assert_eq!(reader.process(&wire), vec![json!("a\nb"), json!({"k": null})]);
        Ok(())
    }

    #[tokio::test]
    async fn test_readers_on_separate_tasks() -> anyhow::Result<()> {
        let mut handles = Vec::new();
        for n in 0..4u64 {
            handles.push(tokio::spawn(async move {
                let mut writer = FrameWriter::default();
                let mut wire = Vec::new();
                write_values(&mut wire, &mut writer, (0..100).map(|i| i * n)).await?;

                let mut reader = FrameReader::<u64>::default();
                let mut sum = 0u64;
                for chunk in wire.chunks(7) {
                    sum += reader.process(chunk).iter().sum::<u64>();
                }
                anyhow::Ok(sum)
            }));
        }

        for (n, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await??, 4950 * n as u64);
        }
        Ok(())
    }
}
