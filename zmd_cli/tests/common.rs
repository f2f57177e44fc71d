use assert_cmd::Command;

pub fn zmd_cmd() -> Command {
	let mut cmd = Command::cargo_bin("zmd").expect("zmd binary builds");
	cmd.env("NO_COLOR", "1");
	cmd
}
