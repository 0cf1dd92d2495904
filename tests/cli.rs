use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::{ensure, Context, Result};
use rfsignature::rendering::raster::{decode_png_data_url, png_digest};

fn rfsignature(dir: &Path, args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_rfsignature"))
        .current_dir(dir)
        .args(args)
        .output()
        .context("failed to run rfsignature")
}

fn png_size(png: &[u8]) -> Result<(u32, u32)> {
    let reader = png::Decoder::new(png).read_info()?;
    let info = reader.info();
    Ok((info.width, info.height))
}

fn pixel(png: &[u8], x: u32, y: u32) -> Result<[u8; 4]> {
    let mut reader = png::Decoder::new(png).read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    ensure!(info.color_type == png::ColorType::Rgba, "expected RGBA output");
    let i = ((y * info.width + x) * 4) as usize;
    Ok([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]])
}

#[test]
fn missing_target_uses_marked_surface() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("page.html"),
        r#"<body>
        <canvas id="first" width="40" height="40"></canvas>
        <canvas class="signature-pad" width="96" height="48"></canvas>
        </body>"#,
    )?;

    let out = rfsignature(dir.path(), &["--page", "page.html", "--out", "sig.png"])?;
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let png = fs::read(dir.path().join("sig.png"))?;
    assert_eq!(png_size(&png)?, (96, 48));
    Ok(())
}

#[test]
fn zero_size_surface_cannot_be_written() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("page.html"),
        r#"<canvas id="flat" width="0" height="40"></canvas>"#,
    )?;

    let out = rfsignature(dir.path(), &["--page", "page.html", "--target", "flat", "--digest"])?;
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no pixels"));

    let out = rfsignature(dir.path(), &["--page", "page.html", "--target", "flat", "--data-url"])?;
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout)?.trim(), "data:,");
    Ok(())
}

#[test]
fn config_and_events_are_replayed() -> Result<()> {
    let dir = tempfile::tempdir()?;
    // The only surface sits at the page margin, client (8, 8).
    fs::write(
        dir.path().join("page.html"),
        r#"<canvas id="pad" width="100" height="50"></canvas>"#,
    )?;
    fs::write(
        dir.path().join("config.json"),
        r##"{"stroke": {"color": "#ff0000", "line_width": 4}}"##,
    )?;
    fs::write(
        dir.path().join("events.json"),
        r#"[
          {"kind": "pointer_down", "client": {"x": 18, "y": 33}},
          {"kind": "pointer_move", "client": {"x": 98, "y": 33}},
          {"kind": "pointer_up"}
        ]"#,
    )?;

    let out = rfsignature(
        dir.path(),
        &[
            "--page", "page.html", "--target", "pad", "--config", "config.json", "--events",
            "events.json", "--out", "sig.png",
        ],
    )?;
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let png = fs::read(dir.path().join("sig.png"))?;
    let [r, g, b, a] = pixel(&png, 50, 24)?;
    assert_eq!(a, 255);
    assert!(r > 200 && g < 50 && b < 50, "expected red ink, got {:?}", [r, g, b, a]);
    assert_eq!(pixel(&png, 50, 5)?[3], 0);
    Ok(())
}

#[test]
fn invalid_config_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("page.html"), r#"<canvas id="pad"></canvas>"#)?;
    fs::write(dir.path().join("config.json"), "{not json")?;

    let out = rfsignature(
        dir.path(),
        &["--page", "page.html", "--target", "pad", "--config", "config.json"],
    )?;
    assert!(!out.status.success());
    Ok(())
}

#[test]
fn data_url_digest_and_file_agree() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("page.html"),
        r#"<canvas id="pad" width="64" height="32"></canvas>"#,
    )?;

    let out = rfsignature(
        dir.path(),
        &["--page", "page.html", "--target", "pad", "--data-url", "--digest", "--out", "sig.png"],
    )?;
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout)?;
    let mut lines = stdout.lines();
    let data_url = lines.next().context("data url line")?;
    let digest = lines.next().context("digest line")?;

    let png = decode_png_data_url(data_url).context("png data url")?;
    assert_eq!(png_digest(&png), digest);
    assert_eq!(fs::read(dir.path().join("sig.png"))?, png);
    Ok(())
}
