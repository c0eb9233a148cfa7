use camino::{Utf8Path, Utf8PathBuf};
use gropack_core::{DependencyKey, DependencySet, NormalizedPath, ResourcePath, VariantFlags};
use gropack_scanner::{accept, Acceptance, SatisfiedBy, ScanContext, ScanOptions, Scanner};
use std::fs;
use tempfile::TempDir;

fn write(root: &Utf8Path, rel: &str, data: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, data).unwrap();
}

fn temp_root() -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, root)
}

fn context(root: &Utf8Path, standard: &[&str], options: ScanOptions) -> ScanContext {
    let standard: DependencySet = standard.iter().map(|s| DependencyKey::new(s)).collect();
    ScanContext::new(root, standard, options)
}

fn path(raw: &str) -> NormalizedPath {
    ResourcePath::normalize(raw).0
}

fn scheduled(ctx: &ScanContext) -> Vec<String> {
    ctx.scheduled().paths().map(|p| p.to_string()).collect()
}

/// 36-byte header, effect marker, body, then the base texture name after a NUL.
fn effect_texture(base: &str) -> Vec<u8> {
    let mut data = vec![0x20; 36];
    data.extend_from_slice(b"FXDT");
    data.extend_from_slice(&[0x33; 40]);
    data.push(0);
    data.extend_from_slice(base.as_bytes());
    data
}

#[test]
fn effect_texture_schedules_its_base_texture() {
    let (_dir, root) = temp_root();
    write(&root, "Textures/Fire.tex", &effect_texture("BaseTex.tex"));

    let mut ctx = context(&root, &[], ScanOptions::default());
    let outcome = accept(&mut ctx, path("Textures\\Fire.tex"));

    assert_eq!(outcome, Acceptance::Scheduled { ordinal: 1 });
    assert_eq!(scheduled(&ctx), vec!["Textures/Fire.tex", "BaseTex.tex"]);
}

#[test]
fn base_texture_already_standard_is_not_scheduled() {
    let (_dir, root) = temp_root();
    write(&root, "Textures/Fire.tex", &effect_texture("Textures\\Base.tex"));

    let mut ctx = context(&root, &["textures/base.tex"], ScanOptions::default());
    accept(&mut ctx, path("Textures\\Fire.tex"));

    assert_eq!(scheduled(&ctx), vec!["Textures/Fire.tex"]);
}

#[test]
fn base_texture_is_read_from_the_variant_directory() {
    let (_dir, root) = temp_root();
    write(&root, "Textures/Fire.tex", &effect_texture("Textures/Base.tex"));

    let mut ctx =
        context(&root, &[], ScanOptions::default()).with_flags(VariantFlags::INSTALL_PROBE);
    accept(&mut ctx, path("TexturesMP/Fire.tex"));

    assert_eq!(scheduled(&ctx), vec!["TexturesMP/Fire.tex", "Textures/Base.tex"]);
    assert!(ctx.flags().contains(VariantFlags::FORWARD_SLASH));
}

#[test]
fn standard_dependencies_are_never_scheduled() {
    let (_dir, root) = temp_root();
    let mut ctx = context(&root, &["models/tree.mdl"], ScanOptions::default());

    for raw in ["Models\\Tree.mdl", "MODELS\\TREE.MDL", "Models/Tree.mdl", "//Models//Tree.mdl"] {
        assert_eq!(
            accept(&mut ctx, path(raw)),
            Acceptance::Satisfied(SatisfiedBy::Standard)
        );
    }
    assert!(ctx.scheduled().is_empty());
}

#[test]
fn scheduling_is_case_insensitive() {
    let (_dir, root) = temp_root();
    let mut ctx = context(&root, &[], ScanOptions::default());

    assert_eq!(
        accept(&mut ctx, path("Sounds\\Door.wav")),
        Acceptance::Scheduled { ordinal: 1 }
    );
    assert_eq!(
        accept(&mut ctx, path("SOUNDS\\door.WAV")),
        Acceptance::AlreadyScheduled
    );
    assert_eq!(scheduled(&ctx), vec!["Sounds/Door.wav"]);
}

#[test]
fn audio_substitution_only_when_enabled() {
    let (_dir, root) = temp_root();
    let standard = ["music/theme.ogg"];

    let options = ScanOptions {
        substitute_audio: true,
        ..Default::default()
    };
    let mut ctx = context(&root, &standard, options);
    assert_eq!(
        accept(&mut ctx, path("Music\\Theme.mp3")),
        Acceptance::Satisfied(SatisfiedBy::SubstituteExtension)
    );

    let mut ctx = context(&root, &standard, ScanOptions::default());
    assert_eq!(
        accept(&mut ctx, path("Music\\Theme.mp3")),
        Acceptance::Scheduled { ordinal: 1 }
    );
}

#[test]
fn substituted_audio_key_carries_into_variant_lookups() {
    let (_dir, root) = temp_root();
    let options = ScanOptions {
        substitute_audio: true,
        ..Default::default()
    };
    let mut ctx = context(&root, &["music/theme.ogg"], options).with_flags(VariantFlags::DECLARED);

    assert_eq!(
        accept(&mut ctx, path("MusicMP\\Theme.mp3")),
        Acceptance::Satisfied(SatisfiedBy::VariantDirectory)
    );
}

#[test]
fn variant_lookups_need_alternate_evidence() {
    let (_dir, root) = temp_root();
    let mut ctx = context(&root, &["models/tree.mdl"], ScanOptions::default());

    // Backslashes alone are the regular engine's idiom
    assert_eq!(
        accept(&mut ctx, path("ModelsMP\\Tree.mdl")),
        Acceptance::Scheduled { ordinal: 1 }
    );

    // A forward slash switches the fallbacks on for this and later names
    let forward = ctx.normalize("ModelsMP/Tree.mdl");
    assert_eq!(
        accept(&mut ctx, forward),
        Acceptance::Satisfied(SatisfiedBy::VariantDirectory)
    );
    assert_eq!(
        accept(&mut ctx, path("ModelsMP\\Tree2.mdl")),
        Acceptance::Scheduled { ordinal: 2 }
    );
    assert_eq!(
        accept(&mut ctx, path("DataMP\\Tree.mdl")),
        Acceptance::Scheduled { ordinal: 3 }
    );
    assert!(ctx.flags().contains(VariantFlags::FORWARD_SLASH));
}

#[test]
fn generic_scan_finds_text_markers() {
    let (_dir, root) = temp_root();
    write(
        &root,
        "Scripts/Intro.txt",
        b"// level script\nTFNM Textures/Wall.tex\nTFNM Textures\\Floor.tex\r\n",
    );

    let mut ctx = context(&root, &["textures/floor.tex"], ScanOptions::default());
    let report = Scanner::scan_file(&mut ctx, &path("Scripts/Intro.txt")).unwrap();

    assert_eq!(scheduled(&ctx), vec!["Textures/Wall.tex"]);
    assert_eq!(report.added[0].path.as_str(), "Textures/Wall.tex");
    assert!(ctx.flags().contains(VariantFlags::FORWARD_SLASH));
}

#[test]
fn generic_scan_reads_length_prefixed_names() {
    let (_dir, root) = temp_root();
    let mut data = vec![0u8; 9];
    data.extend_from_slice(b"EFNM");
    data.extend_from_slice(&16i32.to_le_bytes());
    data.extend_from_slice(b"Models\\Enemy.mdl");
    data.extend_from_slice(&[0u8; 5]);
    write(&root, "Data/Enemy.ecl", &data);

    let options = ScanOptions {
        pack_configs: true,
        ..Default::default()
    };
    let mut ctx = context(&root, &[], options);
    let report = Scanner::scan_file(&mut ctx, &path("Data/Enemy.ecl")).unwrap();

    assert_eq!(scheduled(&ctx), vec!["Models/Enemy.mdl", "Models/Enemy.ini"]);
    assert_eq!(report.added.len(), 2);
}

#[test]
fn report_only_lists_files_added_by_that_scan() {
    let (_dir, root) = temp_root();
    write(&root, "Scripts/A.txt", b"TFNM Sounds\\A.wav\n");
    write(&root, "Scripts/B.txt", b"TFNM Sounds\\A.wav\nTFNM Sounds\\B.wav\n");

    let mut ctx = context(&root, &[], ScanOptions::default());
    Scanner::scan_file(&mut ctx, &path("Scripts/A.txt")).unwrap();
    let report = Scanner::scan_file(&mut ctx, &path("Scripts/B.txt")).unwrap();

    let added: Vec<_> = report.added.iter().map(|f| (f.ordinal, f.path.as_str())).collect();
    assert_eq!(added, vec![(2, "Sounds/B.wav")]);
}
