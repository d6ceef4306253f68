//! Model listing command.

use clap::Args;
use pianoroll_registry::ModelRegistry;

#[derive(Args)]
pub struct ModelsArgs {
    /// Also list each model's jacks
    #[arg(long)]
    ports: bool,
}

pub fn run(args: ModelsArgs) -> anyhow::Result<()> {
    let registry = ModelRegistry::new();

    println!("Available Models");
    println!("================");
    println!();

    for model in registry.all_models() {
        let tags: Vec<&str> = model.tags.iter().map(|t| t.name()).collect();
        println!("  {:12}  {:12}  {}", model.slug, model.name, model.description);
        println!("  {:12}  tags: {}", "", tags.join(", "));

        if args.ports {
            let list = |labels: &[&str]| {
                if labels.is_empty() {
                    "none".to_string()
                } else {
                    labels.join(", ")
                }
            };
            println!("  {:12}  inputs:  {}", "", list(model.inputs));
            println!("  {:12}  outputs: {}", "", list(model.outputs));
        }
    }

    Ok(())
}
