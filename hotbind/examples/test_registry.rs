//! 快捷键注册表演示
//!
//! 声明两个具名快捷键，注册到系统并打印按键事件
//!
//! 运行: cargo run --example test_registry

use std::time::Duration;

use anyhow::Context;
use hotbind::utils::logging::init_logging_with;
use hotbind::{Conflict, Key, Modifier, Registry, RegistryConfig, Shortcut};

fn main() -> anyhow::Result<()> {
    let config = RegistryConfig::load("hotbind.json").context("failed to load hotbind.json")?;
    init_logging_with(&config.log_filter);

    println!("=== 快捷键注册表演示 ===\n");

    // 1. 创建注册表
    println!("1. 创建注册表");
    println!("{}", "-".repeat(40));

    let registry = Registry::builder()
        .config(config)
        .build()
        .context("failed to create shortcut registry")?;
    println!("  系统保留快捷键: {} 个", registry.system_reserved_shortcuts().len());
    println!();

    // 2. 声明名称
    println!("2. 声明名称");
    println!("{}", "-".repeat(40));

    let toggle = registry.declare(
        "toggleMode",
        Some(Shortcut::new(Some(Key::T), [Modifier::Control, Modifier::Shift])?),
    );
    let mute = registry.declare_str("mute", "Control+Shift+M")?;

    for name in &registry.all_names() {
        match registry.shortcut(name) {
            Some(shortcut) => println!("  {} = {} ({})", name, shortcut, shortcut.display_string()),
            None => println!("  {} = <未绑定>", name),
        }
    }
    println!();

    // 3. 冲突检测
    println!("3. 冲突检测");
    println!("{}", "-".repeat(40));

    if let Some(bound) = registry.shortcut(&toggle) {
        match registry.check_conflict(&bound, &mute) {
            Conflict::TakenBy(holder) => println!("  {} 已被 {} 使用", bound, holder),
            Conflict::Reserved => println!("  {} 被系统保留", bound),
            Conflict::Available => println!("  {} 可用", bound),
        }
    }
    println!();

    // 4. 监听按键
    println!("4. 监听按键（30 秒）");
    println!("{}", "-".repeat(40));

    registry.on_key_down(&toggle, || println!("  toggleMode 按下"));
    registry.on_key_up(&toggle, || println!("  toggleMode 松开"));
    registry.on_key_down(&mute, || println!("  mute 按下"));

    std::thread::sleep(Duration::from_secs(30));

    let released = registry.shutdown();
    println!("\n已释放 {} 个系统注册", released);

    Ok(())
}
