use argon2::{Algorithm, Params};
use warden::derivation::argon2::{
    Argon2, Argon2Config, Argon2Error, ConfigError, EncodedHash, MAX_LANES, Variant, Version, verify,
};
use warden::primitives::ZeroedBuffer;

fn rfc9106_config(variant: Variant) -> Argon2Config {
    Argon2Config {
        variant,
        version: Version::V0x13,
        hash_length: 32,
        time_cost: 3,
        memory_cost: 32,
        lanes: 4,
        threads: 1,
        password: ZeroedBuffer::from_slice(&[0x01; 32]),
        salt: Some(vec![0x02; 16]),
        secret: Some(ZeroedBuffer::from_slice(&[0x03; 8])),
        associated_data: Some(vec![0x04; 12]),
        clear_password: false,
        clear_secret: false,
    }
}

fn small_config(password: &[u8]) -> Argon2Config {
    Argon2Config {
        memory_cost: 256,
        time_cost: 2,
        lanes: 4,
        ..Argon2Config::with_password(password, b"somesaltsomesalt")
    }
}

fn tag(config: Argon2Config) -> Vec<u8> {
    Argon2::new(config).unwrap().hash().unwrap().to_vec()
}

fn reference(
    algorithm: Algorithm,
    version: argon2::Version,
    (m, t, p): (u32, u32, u32),
    password: &[u8],
    salt: &[u8],
    secret: Option<&[u8]>,
    len: usize,
) -> Vec<u8> {
    let params = Params::new(m, t, p, Some(len)).unwrap();
    let hasher = match secret {
        Some(secret) => argon2::Argon2::new_with_secret(secret, algorithm, version, params).unwrap(),
        None => argon2::Argon2::new(algorithm, version, params),
    };

    let mut out = vec![0u8; len];
    hasher.hash_password_into(password, salt, &mut out).unwrap();
    out
}

/// RFC 9106 §5.1 - Argon2d test vector
#[test]
fn argon2d_rfc9106_test_vector() {
    let expected =
        hex::decode("512b391b6f1162975371d30919734294f868e3be3984f3c1a13a4db9fabe4acb").unwrap();

    assert_eq!(
        tag(rfc9106_config(Variant::D)),
        expected,
        "Argon2d output does not match RFC 9106 test vector"
    );
}

/// RFC 9106 §5.2 - Argon2i test vector
#[test]
fn argon2i_rfc9106_test_vector() {
    let expected =
        hex::decode("c814d9d1dc7f37aa13f0d77f2494bda1c8de6b016dd388d29952a4c4672b6ce8").unwrap();

    assert_eq!(
        tag(rfc9106_config(Variant::I)),
        expected,
        "Argon2i output does not match RFC 9106 test vector"
    );
}

/// RFC 9106 §5.3 - Argon2id test vector
#[test]
fn argon2id_rfc9106_test_vector() {
    let expected =
        hex::decode("0d640df58d78766c08c037a34a8b53c9d01ef0452d75b65eb52520e96b01e659").unwrap();

    assert_eq!(
        tag(rfc9106_config(Variant::Id)),
        expected,
        "Argon2id output does not match RFC 9106 test vector"
    );
}

#[test]
fn argon2_matches_reference_implementation() {
    let cases = [
        (Variant::D, Algorithm::Argon2d),
        (Variant::I, Algorithm::Argon2i),
        (Variant::Id, Algorithm::Argon2id),
    ];

    for (variant, algorithm) in cases {
        for (version, reference_version) in [
            (Version::V0x13, argon2::Version::V0x13),
            (Version::V0x10, argon2::Version::V0x10),
        ] {
            // 37 blocks over 3 lanes normalises to 36; lengths above 64
            // exercise the chained H'.
            for (m, t, p, len) in [(8, 1, 1, 32), (37, 2, 3, 16), (64, 3, 2, 100)] {
                let ours = tag(Argon2Config {
                    variant,
                    version,
                    hash_length: len as u32,
                    time_cost: t,
                    memory_cost: m,
                    lanes: p,
                    ..Argon2Config::with_password(b"password", b"saltsaltsalt")
                });

                let theirs = reference(
                    algorithm,
                    reference_version,
                    (m, t, p),
                    b"password",
                    b"saltsaltsalt",
                    None,
                    len,
                );

                assert_eq!(ours, theirs, "{variant:?} {version:?} m={m} t={t} p={p} len={len}");
            }
        }
    }
}

#[test]
fn argon2_secret_matches_reference_implementation() {
    let ours = tag(Argon2Config {
        memory_cost: 64,
        time_cost: 2,
        lanes: 2,
        secret: Some(ZeroedBuffer::from_slice(b"pepper-pepper")),
        ..Argon2Config::with_password(b"password", b"saltsaltsalt")
    });

    let theirs = reference(
        Algorithm::Argon2id,
        argon2::Version::V0x13,
        (64, 2, 2),
        b"password",
        b"saltsaltsalt",
        Some(b"pepper-pepper".as_slice()),
        32,
    );

    assert_eq!(ours, theirs);
}

/// Default-strength parameters: 64 MiB, 3 passes, 4 lanes.
#[test]
fn argon2id_golden_default_parameters() {
    let salt = *b"0123456789abcdef";

    let config = Argon2Config {
        variant: Variant::Id,
        version: Version::V0x13,
        memory_cost: 65536,
        time_cost: 3,
        lanes: 4,
        threads: 1,
        ..Argon2Config::with_password(b"password", &salt)
    };

    let ours = tag(config);
    let theirs = reference(
        Algorithm::Argon2id,
        argon2::Version::V0x13,
        (65536, 3, 4),
        b"password",
        &salt,
        None,
        32,
    );
    assert_eq!(ours, theirs);

    let encoded = EncodedHash {
        variant: Variant::Id,
        version: Version::V0x13,
        memory_cost: 65536,
        time_cost: 3,
        lanes: 4,
        salt: salt.to_vec(),
        tag: ours,
    }
    .to_string();

    assert!(verify(&encoded, b"password"));
    assert!(!verify(&encoded, b"passwore"));
}

#[test]
fn argon2_thread_count_does_not_change_tag() {
    let single = tag(small_config(b"password"));

    for threads in [2, 3, 4, 16] {
        let threaded = tag(Argon2Config {
            threads,
            ..small_config(b"password")
        });
        assert_eq!(single, threaded, "threads = {threads}");
    }
}

#[test]
fn argon2_chunked_memory_does_not_change_tag() {
    let single = tag(small_config(b"password"));

    for chunk in [1, 5, 64, 255] {
        let mut engine = Argon2::with_chunk_limit(small_config(b"password"), chunk).unwrap();
        assert_eq!(engine.memory_chunks(), 256usize.div_ceil(chunk));
        assert_eq!(engine.hash().unwrap().to_vec(), single, "chunk = {chunk}");
    }
}

#[test]
fn argon2_hash_is_repeatable_on_one_engine() {
    let mut engine = Argon2::new(small_config(b"password")).unwrap();
    let first = engine.hash().unwrap().to_vec();
    let second = engine.hash().unwrap().to_vec();
    assert_eq!(first, second);
}

#[test]
fn argon2_hash_refuses_cleared_inputs() {
    let mut engine = Argon2::new(Argon2Config {
        clear_password: true,
        ..small_config(b"password")
    })
    .unwrap();

    assert_eq!(engine.hash().unwrap().to_vec(), tag(small_config(b"password")));
    assert!(matches!(engine.hash(), Err(Argon2Error::InputCleared("password"))));

    let mut engine = Argon2::new(Argon2Config {
        secret: Some(ZeroedBuffer::from_slice(b"secret-key")),
        clear_secret: true,
        ..small_config(b"password")
    })
    .unwrap();

    assert!(engine.hash().is_ok());
    let err = engine.hash().err().unwrap();
    assert!(matches!(err, Argon2Error::InputCleared("secret")));
    assert_eq!(err.to_string(), "argon2 secret was cleared by a previous hash");
}

#[test]
fn argon2_inputs_all_affect_tag() {
    let base = tag(small_config(b"password"));

    let different_salt = tag(Argon2Config {
        salt: Some(b"othersaltothersa".to_vec()),
        ..small_config(b"password")
    });
    let with_data = tag(Argon2Config {
        associated_data: Some(b"context".to_vec()),
        ..small_config(b"password")
    });
    let no_salt = tag(Argon2Config {
        salt: None,
        ..small_config(b"password")
    });
    let other_variant = tag(Argon2Config {
        variant: Variant::I,
        ..small_config(b"password")
    });

    assert_ne!(base, different_salt);
    assert_ne!(base, with_data);
    assert_ne!(base, no_salt);
    assert_ne!(base, other_variant);
}

#[test]
fn argon2_respects_output_length() {
    for len in [4, 16, 64, 65, 128, 1024] {
        let out = tag(Argon2Config {
            hash_length: len,
            ..small_config(b"password")
        });
        assert_eq!(out.len(), len as usize);
    }
}

#[test]
fn argon2_memory_is_normalised() {
    let raised = Argon2::new(Argon2Config {
        memory_cost: 1,
        lanes: 2,
        ..small_config(b"password")
    })
    .unwrap();
    assert_eq!(raised.memory_blocks(), 16);

    let rounded = Argon2::new(Argon2Config {
        memory_cost: 37,
        lanes: 3,
        ..small_config(b"password")
    })
    .unwrap();
    assert_eq!(rounded.memory_blocks(), 36);
}

#[test]
fn argon2_clear_flags_wipe_inputs() {
    let expected = tag(Argon2Config {
        secret: Some(ZeroedBuffer::from_slice(b"secret-key")),
        ..small_config(b"password")
    });

    let mut engine = Argon2::new(Argon2Config {
        secret: Some(ZeroedBuffer::from_slice(b"secret-key")),
        clear_password: true,
        clear_secret: true,
        ..small_config(b"password")
    })
    .unwrap();

    assert_eq!(engine.hash().unwrap().to_vec(), expected);

    let config = engine.config();
    assert!(config.password.is_released());
    assert!(config.password.iter().all(|&b| b == 0));

    let secret = config.secret.as_ref().unwrap();
    assert!(secret.is_released());
    assert!(secret.iter().all(|&b| b == 0));
}

#[test]
fn argon2_rejects_invalid_configuration() {
    let cases = [
        (
            Argon2Config {
                hash_length: 3,
                ..small_config(b"pw")
            },
            ConfigError::HashLengthTooShort(3),
        ),
        (
            Argon2Config {
                salt: Some(vec![0; 7]),
                ..small_config(b"pw")
            },
            ConfigError::SaltTooShort(7),
        ),
        (
            Argon2Config {
                secret: Some(ZeroedBuffer::new(129)),
                ..small_config(b"pw")
            },
            ConfigError::SecretTooLong(129),
        ),
        (
            Argon2Config {
                time_cost: 0,
                ..small_config(b"pw")
            },
            ConfigError::TooFewPasses,
        ),
        (
            Argon2Config {
                lanes: 0,
                ..small_config(b"pw")
            },
            ConfigError::LanesOutOfRange(0),
        ),
        (
            Argon2Config {
                lanes: MAX_LANES + 1,
                ..small_config(b"pw")
            },
            ConfigError::LanesOutOfRange(MAX_LANES + 1),
        ),
        (
            Argon2Config {
                threads: 0,
                ..small_config(b"pw")
            },
            ConfigError::TooFewThreads,
        ),
    ];

    for (config, expected) in cases {
        match Argon2::new(config) {
            Err(Argon2Error::Config(err)) => assert_eq!(err, expected),
            Err(other) => panic!("expected {expected:?}, got {other:?}"),
            Ok(_) => panic!("expected {expected:?}, got an engine"),
        }
    }
}

#[test]
fn argon2_errors_do_not_reveal_inputs() {
    let err = Argon2::new(Argon2Config {
        salt: Some(b"short".to_vec()),
        ..small_config(b"hunter2")
    })
    .err()
    .unwrap();

    let message = err.to_string();
    assert!(message.contains("salt"));
    assert!(!message.contains("hunter2"));
    assert!(!message.contains("short"));
}

#[test]
fn argon2_out_of_memory_reports_context() {
    let err = Argon2Error::OutOfMemory {
        requested_blocks: 1 << 30,
        lanes: 4,
        chunk: 3,
        chunk_count: 1024,
    };

    let message = err.to_string();
    assert!(message.contains("1073741824 blocks"));
    assert!(message.contains("4 lanes"));
    assert!(message.contains("chunk 3 of 1024"));
}
