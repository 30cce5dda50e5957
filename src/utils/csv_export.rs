use crate::models::ResultRow;

/// 导出文件的表头
pub const RESULT_HEADER: [&str; 11] = [
    "positie",
    "locatie_id",
    "locatie",
    "artiest",
    "wegingsfactor",
    "stemmen_aantal",
    "punten_totaal",
    "aantal_3",
    "aantal_2",
    "aantal_1",
    "toelichting_bundel",
];

/// CSV 字段: 双引号加倍，整个字段用双引号包裹
pub fn csv_escape(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| csv_escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// 将结果行导出为 CSV 文本 (表头 + 每行一条，\n 分隔)
pub fn results_to_csv(rows: &[ResultRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(csv_line(RESULT_HEADER));

    for r in rows {
        lines.push(csv_line([
            r.positie.to_string(),
            r.locatie_id.to_string(),
            r.locatie.clone(),
            r.artiest.clone(),
            r.wegingsfactor.to_string(),
            r.stemmen_aantal.to_string(),
            r.punten_totaal.to_string(),
            r.aantal_3.to_string(),
            r.aantal_2.to_string(),
            r.aantal_1.to_string(),
            r.toelichting_bundel.clone().unwrap_or_default(),
        ]));
    }

    lines.join("\n")
}
