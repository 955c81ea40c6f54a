//! Prints the Web CRD as YAML.
//!
//! Usage: `cargo run -p crds --bin crdgen > config/crd/web.yaml`

use crds::Web;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&Web::crd())?);
    Ok(())
}
