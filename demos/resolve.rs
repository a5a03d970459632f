use std::sync::Arc;

use layered_props::{Bases, BootstrapSettings, PropertyLookup, ScopedProps};

fn main() -> Result<(), layered_props::Error> {
    // demos/props.toml points at demos/config with hierarchy defaults -> local
    let settings = BootstrapSettings::from_file("demos/props.toml")?;
    let store = Arc::new(settings.load()?);

    let cpp = store.props_for("c++");
    println!(
        "c++ compiler: {}",
        store.get("c++", "compiler", String::from("cc"))
    );
    println!("c++ timeout: {}ms", cpp.get("timeoutMs", 1000i64));

    let props = ScopedProps::builder()
        .with_store(Arc::clone(&store))
        .with_bases(["c++", "rust"])
        .build()?;

    let timeouts = props.get_for_each(&["c++", "rust"], "timeoutMs", 1000i64);
    for (base, timeout) in &timeouts {
        println!("{base}: {timeout}ms");
    }

    let banner = props.get(Bases::None, "banner", String::from("?"), |b| b.to_uppercase());
    println!("banner: {:?}", banner);

    Ok(())
}
