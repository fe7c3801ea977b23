use super::*;
use std::path::PathBuf;

mod config_tests {
    use super::*;
    use crate::embedding::device::DevicePreference;

    #[test]
    fn test_sentence_config_default() {
        let config = SentenceConfig::default();
        assert_eq!(config.model_id, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(config.revision, "main");
        assert!(config.model_dir.is_none());
        assert_eq!(config.max_seq_len, 256);
        assert_eq!(config.batch_size, 32);
        assert!(config.normalize);
        assert_eq!(config.device, DevicePreference::Auto);
        assert!(!config.testing_stub);
        assert_eq!(config.stub_dimension, 384);
    }

    #[test]
    fn test_sentence_config_new() {
        let config = SentenceConfig::new("BAAI/bge-small-en-v1.5");
        assert_eq!(config.model_id, "BAAI/bge-small-en-v1.5");
        assert!(!config.testing_stub);
    }

    #[test]
    fn test_sentence_config_from_dir() {
        let config = SentenceConfig::from_dir("/models/minilm");
        assert_eq!(config.model_dir, Some(PathBuf::from("/models/minilm")));
    }

    #[test]
    fn test_sentence_config_stub() {
        let config = SentenceConfig::stub();
        assert!(config.testing_stub);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_stub_dimension() {
        let config = SentenceConfig {
            stub_dimension: 0,
            ..SentenceConfig::stub()
        };
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validation_zero_lengths() {
        let config = SentenceConfig {
            max_seq_len: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));

        let config = SentenceConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validation_empty_model_id() {
        let config = SentenceConfig::new("  ");
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validation_missing_model_dir() {
        let config = SentenceConfig::from_dir("/nonexistent/model/dir");
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_validation_default_ok() {
        assert!(SentenceConfig::default().validate().is_ok());
    }
}

mod embedder_tests {
    use super::*;
    use tempfile::TempDir;

    fn stub_embedder() -> SentenceEmbedder {
        SentenceEmbedder::load(SentenceConfig::stub()).expect("stub should load")
    }

    #[test]
    fn test_stub_mode_flags() {
        let embedder = stub_embedder();
        assert!(embedder.is_stub());
        assert_eq!(embedder.dimension(), 384);
        assert!(format!("{:?}", embedder).contains("Stub"));
    }

    #[test]
    fn test_stub_embedding_dimension_and_norm() {
        let embedder = stub_embedder();
        let embedding = embedder.embed("hello world").unwrap();

        assert_eq!(embedding.len(), embedder.dimension());
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "norm was {norm}");
    }

    #[test]
    fn test_stub_embedding_deterministic() {
        let embedder = stub_embedder();
        let a = embedder.embed("same text").unwrap();
        let b = embedder.embed("same text").unwrap();
        let c = embedder.embed("other text").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_stub_custom_dimension() {
        let embedder = SentenceEmbedder::load(SentenceConfig {
            stub_dimension: 16,
            ..SentenceConfig::stub()
        })
        .unwrap();

        assert_eq!(embedder.embed("x").unwrap().len(), 16);
    }

    #[test]
    fn test_stub_batch_preserves_order() {
        let embedder = stub_embedder();
        let batch = embedder.embed_batch(&["a", "b", "a"]).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], embedder.embed("a").unwrap());
        assert_eq!(batch[1], embedder.embed("b").unwrap());
        assert_eq!(batch[0], batch[2]);
    }

    #[test]
    fn test_empty_batch() {
        let embedder = stub_embedder();
        assert!(embedder.embed_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_empty_string_embeds() {
        let embedder = stub_embedder();
        assert_eq!(embedder.embed("").unwrap().len(), embedder.dimension());
    }

    #[test]
    fn test_load_from_incomplete_dir_fails() {
        let dir = TempDir::new().unwrap();
        let err = SentenceEmbedder::load(SentenceConfig {
            device: crate::embedding::DevicePreference::Cpu,
            ..SentenceConfig::from_dir(dir.path())
        })
        .unwrap_err();

        assert!(matches!(err, EmbeddingError::ModelNotFound { .. }));
    }

    #[test]
    #[ignore = "downloads sentence-transformers/all-MiniLM-L6-v2 from the Hub"]
    fn test_real_model_embeddings() {
        let embedder = SentenceEmbedder::load(SentenceConfig {
            device: crate::embedding::DevicePreference::Cpu,
            ..Default::default()
        })
        .expect("model should load");
        assert!(!embedder.is_stub());
        assert_eq!(embedder.dimension(), 384);

        let batch = embedder
            .embed_batch(&["A man is eating food.", "A man is eating a piece of bread.", "short"])
            .unwrap();
        assert_eq!(batch.len(), 3);
        for v in &batch {
            assert_eq!(v.len(), 384);
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-3);
        }

        // Padding must not change a sentence's vector.
        let single = embedder.embed("short").unwrap();
        let diff: f32 = single
            .iter()
            .zip(&batch[2])
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max);
        assert!(diff < 1e-4, "max diff {diff}");
    }
}

mod model_tests {
    use super::*;
    use crate::embedding::DevicePreference;
    use candle_core::DType;
    use crate::embedding::loader::{CONFIG_FILE, SAFETENSORS_FILE, TOKENIZER_FILE};
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const HIDDEN: usize = 8;
    const INTERMEDIATE: usize = 16;
    const LAYERS: usize = 2;
    const MAX_POSITIONS: usize = 32;
    const WORDS: &[&str] = &[
        "[PAD]", "[UNK]", "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "a",
        "cat", "sat", "on", "mat", "hello",
    ];

    fn write_tokenizer(dir: &Path) {
        let vocab: serde_json::Map<String, serde_json::Value> = WORDS
            .iter()
            .enumerate()
            .map(|(id, word)| (word.to_string(), serde_json::json!(id)))
            .collect();
        let tokenizer = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": {"type": "Lowercase"},
            "pre_tokenizer": {"type": "WhitespaceSplit"},
            "post_processor": null,
            "decoder": null,
            "model": {"type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]"}
        });
        fs::write(dir.join(TOKENIZER_FILE), tokenizer.to_string()).unwrap();
    }

    fn write_config(dir: &Path) {
        let config = serde_json::json!({
            "vocab_size": WORDS.len(),
            "hidden_size": HIDDEN,
            "num_hidden_layers": LAYERS,
            "num_attention_heads": 2,
            "intermediate_size": INTERMEDIATE,
            "hidden_act": "gelu",
            "hidden_dropout_prob": 0.0,
            "attention_probs_dropout_prob": 0.0,
            "max_position_embeddings": MAX_POSITIONS,
            "type_vocab_size": 2,
            "initializer_range": 0.02,
            "layer_norm_eps": 1e-12,
            "pad_token_id": 0,
            "position_embedding_type": "absolute",
            "use_cache": false,
            "classifier_dropout": null,
            "model_type": "bert"
        });
        fs::write(dir.join(CONFIG_FILE), config.to_string()).unwrap();
    }

    fn write_weights(dir: &Path) {
        let device = Device::Cpu;
        let mut tensors: HashMap<String, Tensor> = HashMap::new();
        let mut random = |name: String, shape: &[usize]| {
            let t = Tensor::randn(0f32, 0.5, shape, &device).unwrap();
            tensors.insert(name, t);
        };

        random("embeddings.word_embeddings.weight".into(), &[WORDS.len(), HIDDEN]);
        random("embeddings.position_embeddings.weight".into(), &[MAX_POSITIONS, HIDDEN]);
        random("embeddings.token_type_embeddings.weight".into(), &[2, HIDDEN]);
        for layer in 0..LAYERS {
            let p = format!("encoder.layer.{layer}");
            for name in ["query", "key", "value"] {
                random(format!("{p}.attention.self.{name}.weight"), &[HIDDEN, HIDDEN]);
                random(format!("{p}.attention.self.{name}.bias"), &[HIDDEN]);
            }
            random(format!("{p}.attention.output.dense.weight"), &[HIDDEN, HIDDEN]);
            random(format!("{p}.attention.output.dense.bias"), &[HIDDEN]);
            random(format!("{p}.intermediate.dense.weight"), &[INTERMEDIATE, HIDDEN]);
            random(format!("{p}.intermediate.dense.bias"), &[INTERMEDIATE]);
            random(format!("{p}.output.dense.weight"), &[HIDDEN, INTERMEDIATE]);
            random(format!("{p}.output.dense.bias"), &[HIDDEN]);
        }

        let mut norms = vec!["embeddings.LayerNorm".to_string()];
        for layer in 0..LAYERS {
            norms.push(format!("encoder.layer.{layer}.attention.output.LayerNorm"));
            norms.push(format!("encoder.layer.{layer}.output.LayerNorm"));
        }
        for norm in norms {
            tensors.insert(
                format!("{norm}.weight"),
                Tensor::ones(HIDDEN, DType::F32, &device).unwrap(),
            );
            tensors.insert(
                format!("{norm}.bias"),
                Tensor::zeros(HIDDEN, DType::F32, &device).unwrap(),
            );
        }

        candle_core::safetensors::save(&tensors, dir.join(SAFETENSORS_FILE)).unwrap();
    }

    /// Writes a two-layer BERT with random weights and a word-level tokenizer.
    fn tiny_model_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_tokenizer(dir.path());
        write_config(dir.path());
        write_weights(dir.path());
        dir
    }

    fn load(dir: &TempDir, batch_size: usize, normalize: bool) -> SentenceEmbedder {
        SentenceEmbedder::load(SentenceConfig {
            model_id: "test/tiny-bert".to_string(),
            batch_size,
            normalize,
            max_seq_len: 16,
            device: DevicePreference::Cpu,
            ..SentenceConfig::from_dir(dir.path())
        })
        .expect("tiny model should load")
    }

    fn max_diff(a: &[f32], b: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len());
        a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f32::max)
    }

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    const TEXTS: &[&str] = &[
        "the quick brown fox jumps over the lazy dog",
        "hello",
        "a cat sat on the mat",
        "the dog",
        "quick fox jumps",
    ];

    #[test]
    fn test_tiny_model_loads() {
        let dir = tiny_model_dir();
        let embedder = load(&dir, 2, true);

        assert!(!embedder.is_stub());
        assert_eq!(embedder.dimension(), HIDDEN);
        assert!(format!("{:?}", embedder).contains("Model"));
    }

    #[test]
    fn test_chunked_batch_matches_single_embeddings_in_order() {
        let dir = tiny_model_dir();
        let embedder = load(&dir, 2, true);

        let batch = embedder.embed_batch(TEXTS).unwrap();
        assert_eq!(batch.len(), TEXTS.len());

        for (text, row) in TEXTS.iter().zip(&batch) {
            let single = embedder.embed(text).unwrap();
            let diff = max_diff(&single, row);
            assert!(diff < 1e-4, "{text:?} differs by {diff}");
        }
        assert!(max_diff(&batch[0], &batch[1]) > 1e-3);
    }

    #[test]
    fn test_normalized_rows_are_unit_length() {
        let dir = tiny_model_dir();
        let embedder = load(&dir, 2, true);

        for row in embedder.embed_batch(TEXTS).unwrap() {
            assert_eq!(row.len(), HIDDEN);
            assert!((norm(&row) - 1.0).abs() < 1e-4, "norm was {}", norm(&row));
        }
    }

    #[test]
    fn test_normalize_off_keeps_direction() {
        let dir = tiny_model_dir();
        let raw = load(&dir, 32, false).embed("a cat sat on the mat").unwrap();
        let unit = load(&dir, 32, true).embed("a cat sat on the mat").unwrap();

        let scaled: Vec<f32> = raw.iter().map(|x| x / norm(&raw)).collect();
        assert!(max_diff(&scaled, &unit) < 1e-4);
    }

    #[test]
    fn test_padding_does_not_change_embedding() {
        let dir = tiny_model_dir();
        let embedder = load(&dir, 32, true);

        let alone = embedder.embed("the dog").unwrap();
        let padded = embedder
            .embed_batch(&["the dog", "the quick brown fox jumps over the lazy dog"])
            .unwrap();

        let diff = max_diff(&alone, &padded[0]);
        assert!(diff < 1e-4, "padding changed the vector by {diff}");
    }

    #[test]
    fn test_unknown_words_still_embed() {
        let dir = tiny_model_dir();
        let embedder = load(&dir, 32, true);

        let row = embedder.embed("zebra quantum").unwrap();
        assert_eq!(row.len(), HIDDEN);
        assert!(row.iter().all(|x| x.is_finite()));
    }
}
