use byteorder::{LittleEndian, WriteBytesExt};
use camino::{Utf8Path, Utf8PathBuf};
use gropack_core::VariantFlags;
use gropack_infra::list_entries;
use gropack_pipeline::{Game, PackEngine, PackError, PackOptions, PackRequest};
use std::fs::{self, File};
use std::io::Write;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

fn temp_root() -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, root)
}

fn write(root: &Utf8Path, rel: &str, data: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, data).unwrap();
}

fn standard_archive(root: &Utf8Path, name: &str, entries: &[&str]) {
    let mut zip = ZipWriter::new(File::create(root.join(name)).unwrap());
    zip.add_directory("Textures/", SimpleFileOptions::default())
        .unwrap();
    for entry in entries {
        zip.start_file(*entry, SimpleFileOptions::default()).unwrap();
        zip.write_all(b"standard").unwrap();
    }
    zip.finish().unwrap();
}

fn string_field(out: &mut Vec<u8>, s: &str) {
    out.write_i32::<LittleEndian>(s.len() as i32).unwrap();
    out.extend_from_slice(s.as_bytes());
}

fn dictionary(out: &mut Vec<u8>, names: &[&str]) {
    out.extend_from_slice(b"DPOS");
    let at = out.len() as i32 + 4;
    out.write_i32::<LittleEndian>(at).unwrap();
    out.extend_from_slice(b"DICT");
    out.write_i32::<LittleEndian>(names.len() as i32).unwrap();
    for name in names {
        out.extend_from_slice(b"DFNM");
        string_field(out, name);
    }
    out.extend_from_slice(b"DEND");
}

fn world(brushes: &[&str], entities: &[&str]) -> Vec<u8> {
    let mut out = b"BUIV".to_vec();
    out.write_i32::<LittleEndian>(10000).unwrap();
    out.extend_from_slice(b"WRLDWLIF");
    string_field(&mut out, "Level");
    out.extend_from_slice(&[0; 4]);
    string_field(&mut out, "");
    out.extend_from_slice(&[0x42; 20]);
    dictionary(&mut out, brushes);
    dictionary(&mut out, entities);
    out
}

fn request(root: &Utf8Path, inputs: &[&str], options: PackOptions) -> PackRequest {
    PackRequest {
        root: root.to_path_buf(),
        output: "Out/Level.gro".into(),
        inputs: inputs.iter().map(Utf8PathBuf::from).collect(),
        store: vec![".WLD".to_string()],
        standard: Vec::new(),
        options,
    }
}

fn scheduled(plan: &gropack_pipeline::PackPlan) -> Vec<&str> {
    plan.files.paths().map(|p| p.as_str()).collect()
}

#[test]
fn second_encounter_world_is_packed_without_standard_files() {
    let (_dir, root) = temp_root();
    standard_archive(
        &root,
        "SE1_00.gro",
        &["Textures/Standard.tex", "Models/Standard.mdl"],
    );
    write(
        &root,
        "Levels/Map.wld",
        &world(
            &["Textures\\Standard.tex", "Textures\\Custom.tex"],
            &["Models\\STANDARD.mdl", "Models\\Custom.mdl", "Sounds\\Missing.wav"],
        ),
    );
    write(&root, "Textures/Custom.tex", &[3u8; 64]);
    write(&root, "Models/Custom.mdl", &[4u8; 64]);
    write(&root, "Models/Custom.ini", b"[model]");

    let options = PackOptions {
        pack_configs: true,
        detect_game: true,
        ..Default::default()
    };
    let engine = PackEngine::new(request(&root, &["Levels/Map.wld"], options));
    let plan = engine.plan().unwrap();

    assert_eq!(plan.game, Some(Game::SecondEncounter));
    assert_eq!(plan.standard.archives, vec![("SE1_00.gro".to_string(), 2)]);
    assert_eq!(plan.standard.missing.len(), 5);
    assert!(plan.failures.is_empty());
    assert!(!plan.is_alternate());
    assert_eq!(
        scheduled(&plan),
        vec![
            "Levels/Map.wld",
            "Textures/Custom.tex",
            "Models/Custom.mdl",
            "Models/Custom.ini",
            "Sounds/Missing.wav",
        ]
    );

    let missing = engine.verify(&plan);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].as_str(), "Sounds/Missing.wav");

    let report = engine.execute(&plan, None).unwrap();
    assert_eq!(report.missing, missing);

    let output = root.join("Out/Level.gro");
    let mut entries = list_entries(&output).unwrap();
    entries.sort();
    assert_eq!(
        entries,
        vec![
            "Levels/Map.wld",
            "Models/Custom.ini",
            "Models/Custom.mdl",
            "Textures/Custom.tex",
        ]
    );

    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    assert_eq!(
        archive.by_name("Levels/Map.wld").unwrap().compression(),
        CompressionMethod::Stored
    );
    assert_eq!(
        archive.by_name("Models/Custom.mdl").unwrap().compression(),
        CompressionMethod::Deflated
    );
}

#[test]
fn failed_input_blocks_assembly_unless_partial() {
    let (_dir, root) = temp_root();
    write(&root, "Levels/Broken.wld", b"not a world at all");
    write(&root, "Scripts/Intro.txt", b"TFNM Textures\\Wall.tex\n");

    let engine = PackEngine::new(request(
        &root,
        &["Levels/Broken.wld", "Scripts/Intro.txt"],
        PackOptions::default(),
    ));
    let plan = engine.plan().unwrap();

    assert_eq!(plan.failures.len(), 1);
    assert_eq!(plan.failures[0].path.as_str(), "Levels/Broken.wld");
    assert_eq!(
        scheduled(&plan),
        vec!["Levels/Broken.wld", "Scripts/Intro.txt", "Textures/Wall.tex"]
    );

    let err = engine.execute(&plan, None).unwrap_err();
    assert!(matches!(err, PackError::IncompleteScan { failed: 1 }));
    assert!(!root.join("Out/Level.gro").exists());

    let mut req = engine.request().clone();
    req.options.allow_partial = true;
    let report = PackEngine::new(req).execute(&plan, None).unwrap();
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.missing[0].as_str(), "Textures/Wall.tex");
}

#[test]
fn revolution_install_enables_variant_directories() {
    let (_dir, root) = temp_root();
    standard_archive(&root, "All_01.gro", &["Models/Tree.mdl"]);
    standard_archive(&root, "All_02.gro", &[]);
    write(
        &root,
        "Levels/Map.wld",
        &world(&["TexturesMP\\Wall.tex"], &["ModelsMP\\Tree.mdl"]),
    );
    write(&root, "Textures/Wall.tex", &[9u8; 80]);

    let options = PackOptions {
        detect_game: true,
        derived: true,
        ..Default::default()
    };
    let engine = PackEngine::new(request(&root, &["Levels/Map.wld"], options));
    let plan = engine.plan().unwrap();

    assert_eq!(plan.game, Some(Game::Revolution));
    assert!(plan.flags.contains(VariantFlags::INSTALL_PROBE));
    assert_eq!(scheduled(&plan), vec!["Levels/Map.wld", "TexturesMP/Wall.tex"]);
    assert!(engine.verify(&plan).is_empty());

    let report = engine.execute(&plan, None).unwrap();
    assert_eq!(report.written, vec!["Levels/Map.wld", "Textures/Wall.tex"]);
}

#[test]
fn first_encounter_accepts_ogg_for_mp3() {
    let (_dir, root) = temp_root();
    standard_archive(&root, "1_00c.gro", &["Music/Theme.ogg"]);
    write(
        &root,
        "Levels/Map.wld",
        &world(&[], &["Music\\Theme.mp3", "Music\\Boss.mp3"]),
    );

    let options = PackOptions {
        detect_game: true,
        derived: true,
        ..Default::default()
    };
    let plan = PackEngine::new(request(&root, &["Levels/Map.wld"], options))
        .plan()
        .unwrap();

    assert_eq!(plan.game, Some(Game::FirstEncounter));
    assert_eq!(scheduled(&plan), vec!["Levels/Map.wld", "Music/Boss.mp3"]);
}

#[test]
fn ignore_entries_must_exist_under_the_root() {
    let (_dir, root) = temp_root();
    write(&root, "Textures/Shared.tex", b"shared");
    write(
        &root,
        "Levels/Map.wld",
        &world(&["Textures\\Shared.tex", "Textures\\Nope.tex"], &[]),
    );

    let mut req = request(&root, &["Levels/Map.wld"], PackOptions::default());
    req.standard = vec!["Textures/Shared.tex".to_string(), "Textures/Nope.tex".to_string()];
    let plan = PackEngine::new(req).plan().unwrap();

    assert_eq!(plan.game, None);
    assert_eq!(plan.standard.files, 1);
    assert_eq!(plan.standard.missing, vec!["Textures/Nope.tex"]);
    assert_eq!(scheduled(&plan), vec!["Levels/Map.wld", "Textures/Nope.tex"]);
}

#[test]
fn directory_inputs_expand_in_name_order() {
    let (_dir, root) = temp_root();
    write(&root, "Scripts/b.txt", b"TFNM Sounds\\B.wav\n");
    write(&root, "Scripts/a.txt", b"TFNM Sounds\\A.wav\n");
    write(&root, "Scripts/sub/c.txt", b"");

    let abs = root.join("Scripts");
    let req = request(&root, &[abs.as_str()], PackOptions::default());
    let plan = PackEngine::new(req).plan().unwrap();

    assert_eq!(
        scheduled(&plan),
        vec![
            "Scripts/a.txt",
            "Sounds/A.wav",
            "Scripts/b.txt",
            "Sounds/B.wav",
            "Scripts/sub/c.txt",
        ]
    );
    assert!(plan.flags.is_empty());
}

#[test]
fn inputs_outside_the_root_are_rejected() {
    let (_dir, root) = temp_root();
    let (_other, elsewhere) = temp_root();
    let req = request(
        &root,
        &[elsewhere.join("Map.wld").as_str()],
        PackOptions::default(),
    );
    assert!(matches!(
        PackEngine::new(req).plan(),
        Err(PackError::OutsideRoot { .. })
    ));
}

#[test]
fn plan_summary_serializes() {
    let (_dir, root) = temp_root();
    standard_archive(&root, "SE1_00.gro", &[]);
    write(&root, "Levels/Map.wld", &world(&["Textures/New.tex"], &[]));

    let options = PackOptions {
        detect_game: true,
        ..Default::default()
    };
    let plan = PackEngine::new(request(&root, &["Levels/Map.wld"], options))
        .plan()
        .unwrap();
    let json = serde_json::to_value(plan.summary()).unwrap();

    assert_eq!(json["game"], "second-encounter");
    assert_eq!(json["alternate"], true);
    assert_eq!(json["flags"], "forward-slash");
    assert_eq!(json["files"][1]["ordinal"], 2);
    assert_eq!(json["files"][1]["path"], "Textures/New.tex");
    assert_eq!(json["reports"][0]["source"], "Levels/Map.wld");
    assert!(json["failures"].as_array().unwrap().is_empty());
}

#[test]
fn explicit_runs_only_ignore_detected_archives() {
    let (_dir, root) = temp_root();
    standard_archive(&root, "All_01.gro", &["Models/Tree.mdl", "Music/Theme.ogg"]);
    standard_archive(&root, "All_02.gro", &[]);
    write(
        &root,
        "Levels/Map.wld",
        &world(&["TexturesMP\\Wall.tex"], &["ModelsMP\\Tree.mdl", "Models\\Tree.mdl"]),
    );

    let options = PackOptions {
        detect_game: true,
        ..Default::default()
    };
    let plan = PackEngine::new(request(&root, &["Levels/Map.wld"], options))
        .plan()
        .unwrap();

    assert_eq!(plan.game, Some(Game::Revolution));
    assert!(!plan.flags.contains(VariantFlags::INSTALL_PROBE));
    assert_eq!(
        scheduled(&plan),
        vec!["Levels/Map.wld", "TexturesMP/Wall.tex", "ModelsMP/Tree.mdl"]
    );
}
