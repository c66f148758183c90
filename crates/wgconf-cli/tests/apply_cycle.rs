// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Full plan/apply cycles against a temporary state file and output dir.

use std::path::Path;

use tempfile::TempDir;
use wgconf_cli::{ApplyError, ConfigAction, Manifest, ManifestError, PeerAction, State, Workspace};
use wgconf_keys::{Identifier, KeyPair};
use wgconf_template::{Arity, FunctionLibrary, TemplateRenderer, Value};

const TEMPLATES: &str = r#"
interface_template = """
[Interface]
PrivateKey = ${private_key}
Address = ${address}
ListenPort = ${port}"""
peer_template = """
[Peer]
PublicKey = ${public_key}
AllowedIPs = ${address}"""

[vars]
port = 51820
"#;

fn manifest(peers: &[(&str, &str)]) -> Manifest {
	let mut text = TEMPLATES.to_string();
	for (name, address) in peers {
		text.push_str(&format!(
			"\n[[peer]]\nname = \"{name}\"\nvars = {{ address = \"{address}\" }}\n"
		));
	}
	Manifest::parse(&text).unwrap()
}

fn workspace(dir: &TempDir) -> Workspace {
	Workspace::new(dir.path().join("state.json"), dir.path().join("out"))
}

fn entropy() -> Vec<u8> {
	(0u8..=255).rev().collect()
}

fn read(path: &Path) -> String {
	std::fs::read_to_string(path).unwrap()
}

#[test]
fn apply_writes_one_config_per_peer_excluding_self() {
	let dir = TempDir::new().unwrap();
	let ws = workspace(&dir);
	let net = manifest(&[("alpha", "10.0.0.1/32"), ("beta", "10.0.0.2/32"), ("gamma", "10.0.0.3/32")]);

	let bytes = entropy();
	let evaluation = ws.apply(&net, &mut bytes.as_slice()).unwrap();
	assert_eq!(evaluation.configs.len(), 3);

	let state = State::load(ws.state_file()).unwrap();
	for name in ["alpha", "beta", "gamma"] {
		let config = read(&ws.config_path(name).unwrap());
		let own = &state.peers[name].peer_rendered;
		assert!(config.starts_with("[Interface]\nPrivateKey = "));
		assert!(!config.contains(own.as_str()), "{name} config contains its own peer section");
		for other in state.peers.keys().filter(|n| *n != name) {
			assert!(config.contains(state.peers[other].peer_rendered.as_str()));
		}
		assert_eq!(
			state.configs[name].id,
			wgconf_compose::config_id(&config)
		);
	}
}

#[test]
fn second_apply_with_same_inputs_is_stable() {
	let dir = TempDir::new().unwrap();
	let ws = workspace(&dir);
	let net = manifest(&[("alpha", "10.0.0.1/32"), ("beta", "10.0.0.2/32")]);

	let bytes = entropy();
	let first = ws.apply(&net, &mut bytes.as_slice()).unwrap();
	// No entropy: every peer must come from state.
	let second = ws.apply(&net, &mut std::io::empty()).unwrap();

	assert!(!second.plan.has_changes());
	assert_eq!(second.plan.peer("alpha"), Some(PeerAction::NoChange));
	assert_eq!(first.state, second.state);
	for (a, b) in first.configs.iter().zip(&second.configs) {
		assert_eq!(a.id, b.id);
		assert_eq!(b.action, ConfigAction::NoChange);
	}
}

#[test]
fn changed_vars_update_peer_and_every_config() {
	let dir = TempDir::new().unwrap();
	let ws = workspace(&dir);
	let bytes = entropy();
	ws.apply(
		&manifest(&[("alpha", "10.0.0.1/32"), ("beta", "10.0.0.2/32")]),
		&mut bytes.as_slice(),
	)
	.unwrap();

	let evaluation = ws
		.plan(
			&manifest(&[("alpha", "10.0.0.9/32"), ("beta", "10.0.0.2/32")]),
			&mut std::io::empty(),
		)
		.unwrap();
	assert_eq!(
		evaluation.plan.peer("alpha"),
		Some(PeerAction::Update {
			interface: true,
			peer: true
		})
	);
	assert_eq!(evaluation.plan.peer("beta"), Some(PeerAction::NoChange));
	// alpha's interface changed; beta's candidate list changed.
	assert_eq!(evaluation.plan.config("alpha").unwrap().action, ConfigAction::Update);
	assert_eq!(evaluation.plan.config("beta").unwrap().action, ConfigAction::Update);
}

#[test]
fn removed_peer_deletes_record_and_config_file() {
	let dir = TempDir::new().unwrap();
	let ws = workspace(&dir);
	let bytes = entropy();
	ws.apply(
		&manifest(&[("alpha", "10.0.0.1/32"), ("beta", "10.0.0.2/32")]),
		&mut bytes.as_slice(),
	)
	.unwrap();
	assert!(ws.config_path("beta").unwrap().exists());

	let evaluation = ws
		.apply(&manifest(&[("alpha", "10.0.0.1/32")]), &mut std::io::empty())
		.unwrap();
	assert_eq!(evaluation.plan.peer("beta"), Some(PeerAction::Delete));
	assert!(!ws.config_path("beta").unwrap().exists());

	let state = State::load(ws.state_file()).unwrap();
	assert!(!state.peers.contains_key("beta"));
	assert_eq!(read(&ws.config_path("alpha").unwrap()).matches("[Peer]").count(), 0);
}

#[test]
fn path_like_peer_name_never_reaches_the_filesystem() {
	let dir = TempDir::new().unwrap();
	let ws = workspace(&dir);

	let text = format!("{TEMPLATES}\n[[peer]]\nname = \"../escaped\"\nvars = {{ address = \"10.0.0.9/32\" }}\n");
	let err = Manifest::parse(&text).unwrap_err();
	assert!(matches!(err, ManifestError::InvalidName(ref n) if n == "../escaped"));
	assert!(!dir.path().join("escaped.conf").exists());

	assert!(matches!(
		ws.config_path("../escaped"),
		Err(ApplyError::InvalidPeerName(_))
	));
}

#[test]
fn tampered_state_name_cannot_remove_files_outside_output_dir() {
	let dir = TempDir::new().unwrap();
	let ws = workspace(&dir);
	let bytes = entropy();
	ws.apply(
		&manifest(&[("alpha", "10.0.0.1/32"), ("beta", "10.0.0.2/32")]),
		&mut bytes.as_slice(),
	)
	.unwrap();

	let outside = dir.path().join("escaped.conf");
	std::fs::write(&outside, "keep").unwrap();
	let mut state = State::load(ws.state_file()).unwrap();
	let record = state.peers.remove("beta").unwrap();
	state.peers.insert("../escaped".into(), record);
	state.save(ws.state_file()).unwrap();

	let err = ws
		.apply(&manifest(&[("alpha", "10.0.0.1/32")]), &mut std::io::empty())
		.unwrap_err();
	assert!(matches!(err, ApplyError::InvalidPeerName(ref n) if n == "../escaped"));
	assert_eq!(read(&outside), "keep");
}

#[test]
fn imported_identifier_yields_expected_public_key() {
	let dir = TempDir::new().unwrap();
	let ws = workspace(&dir);
	let id = Identifier::from_bytes([0x42; 32]);
	let expected = KeyPair::from_identifier(&id).public_key().to_base64();

	let text = format!(
		"{TEMPLATES}\n[[peer]]\nname = \"imported\"\nidentifier = \"{id}\"\nvars = {{ address = \"10.0.0.5/32\" }}\n"
	);
	ws.apply(&Manifest::parse(&text).unwrap(), &mut std::io::empty())
		.unwrap();

	let view = ws.show("imported").unwrap();
	assert_eq!(view.identifier, id);
	assert_eq!(view.public_key.to_base64(), expected);
	let state = State::load(ws.state_file()).unwrap();
	assert!(state.peers["imported"]
		.peer_rendered
		.contains(&format!("PublicKey = {expected}")));
}

#[test]
fn state_file_never_contains_private_keys() {
	let dir = TempDir::new().unwrap();
	let ws = workspace(&dir);
	let bytes = entropy();
	ws.apply(
		&manifest(&[("alpha", "10.0.0.1/32"), ("beta", "10.0.0.2/32")]),
		&mut bytes.as_slice(),
	)
	.unwrap();

	let raw = read(ws.state_file());
	let state = State::load(ws.state_file()).unwrap();
	for (name, record) in &state.peers {
		let private = KeyPair::from_identifier(&record.identifier)
			.private_key()
			.to_base64();
		assert!(!raw.contains(private.expose().as_str()));
		assert!(read(&ws.config_path(name).unwrap()).contains(private.expose().as_str()));
	}
}

#[test]
fn show_matches_written_config() {
	let dir = TempDir::new().unwrap();
	let ws = workspace(&dir);
	let bytes = entropy();
	ws.apply(
		&manifest(&[("alpha", "10.0.0.1/32"), ("beta", "10.0.0.2/32")]),
		&mut bytes.as_slice(),
	)
	.unwrap();

	let view = ws.show("beta").unwrap();
	let config = view.config.unwrap();
	assert_eq!(config.action, ConfigAction::NoChange);
	assert_eq!(config.rendered.expose(), &read(&ws.config_path("beta").unwrap()));
	assert!(ws.show("nobody").is_err());
}

#[cfg(unix)]
#[test]
fn config_files_are_owner_only() {
	use std::os::unix::fs::PermissionsExt;
	let dir = TempDir::new().unwrap();
	let ws = workspace(&dir);
	let bytes = entropy();
	ws.apply(&manifest(&[("alpha", "10.0.0.1/32")]), &mut bytes.as_slice())
		.unwrap();
	let mode = std::fs::metadata(ws.config_path("alpha").unwrap())
		.unwrap()
		.permissions()
		.mode();
	assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn injected_function_library_renders_configs() {
	let dir = TempDir::new().unwrap();
	let mut functions = FunctionLibrary::builtin();
	functions.register("host", Arity::Exact(1), |args| {
		let address = args[0].to_primitive_string().unwrap_or_default();
		let host = address.split('/').next().unwrap_or_default().to_string();
		Ok(Value::String(host))
	});
	let ws = workspace(&dir).with_renderer(TemplateRenderer::new(functions));

	let net = Manifest::parse(
		r#"
interface_template = "[Interface]\nPrivateKey = ${private_key}"
peer_template = "[Peer]\nPublicKey = ${public_key}\nEndpoint = ${host(address)}:51820"

[[peer]]
name = "alpha"
vars = { address = "10.0.0.1/32" }

[[peer]]
name = "beta"
vars = { address = "10.0.0.2/32" }
"#,
	)
	.unwrap();

	let bytes = entropy();
	ws.apply(&net, &mut bytes.as_slice()).unwrap();
	assert!(read(&ws.config_path("alpha").unwrap()).contains("Endpoint = 10.0.0.2:51820"));
	assert!(read(&ws.config_path("beta").unwrap()).contains("Endpoint = 10.0.0.1:51820"));

	let err = Workspace::new(dir.path().join("other.json"), dir.path().join("other"))
		.apply(&net, &mut bytes.as_slice())
		.unwrap_err();
	assert!(matches!(err, ApplyError::Compose { ref peer, .. } if peer == "alpha"));
}
