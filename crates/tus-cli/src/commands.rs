use anyhow::Result;
use comfy_table::Table;

use tus_cli::pipeline::{LayoutSource, RunConfig, RunResult, run_harmonization};
use tus_ingest::ReadOptions;
use tus_model::PipelineOptions;
use tus_standards::{CodeMapRegistry, PRESET_NAMES, layout_preset};

use crate::cli::RunArgs;
use crate::summary::apply_table_style;

pub fn run_layouts() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Layout", "Modules", "Design key", "Geography"]);
    apply_table_style(&mut table);
    for name in PRESET_NAMES {
        let layout = layout_preset(name)?;
        let modules = layout
            .modules
            .iter()
            .map(|module| format!("{} ({})", module.kind, module.file_stems.join(", ")))
            .collect::<Vec<_>>()
            .join("\n");
        let geography = if layout.geography.is_some() {
            "yes"
        } else {
            "no"
        };
        table.add_row(vec![
            layout.name.clone(),
            modules,
            layout.design_key.join(", "),
            geography.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_code_maps() -> Result<()> {
    let registry = CodeMapRegistry::builtin();
    let mut table = Table::new();
    table.set_header(vec!["Code map", "Codes", "Null fallback"]);
    apply_table_style(&mut table);
    for name in registry.names() {
        if let Some(map) = registry.get(name) {
            table.add_row(vec![
                name.to_string(),
                map.len().to_string(),
                map.null_fallback.clone(),
            ]);
        }
    }
    println!("{table}");
    Ok(())
}

pub fn run_survey(args: &RunArgs) -> Result<RunResult> {
    run_harmonization(&run_config(args))
}

fn run_config(args: &RunArgs) -> RunConfig {
    let layout = match &args.layout_file {
        Some(path) => LayoutSource::File(path.clone()),
        None => LayoutSource::Preset(args.layout.clone()),
    };

    let mut read = ReadOptions::default().with_infer_types(args.infer_types);
    if args.infer_schema_length.is_some() {
        read = read.with_infer_schema_length(args.infer_schema_length);
    }

    let mut options = PipelineOptions::new().with_parallel(args.parallel);
    if let Some(workers) = args.max_workers {
        options = options.with_max_workers(workers);
    }

    let mut config = RunConfig::new(&args.input_dir)
        .with_layout(layout)
        .with_districts(args.districts.clone())
        .with_code_maps(args.code_maps.clone())
        .with_read_options(read)
        .with_options(options);
    if let Some(output) = &args.output {
        config = config.with_output(output);
    }
    if let Some(logs_dir) = &args.logs_dir {
        config = config.with_logs_dir(logs_dir);
    }
    config
}
