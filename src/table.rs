//! 테이블 디코더 모듈: XMLSERVICE 응답 XML → [`Table`]
//!
//! 쿼리 응답은 두 개의 "테이블"을 담습니다.
//!
//! - `col`: 출력 컬럼마다 한 행, 첫 번째 필드가 컬럼명
//! - `data`: 평탄한 셀 스트림, 각 행이 `(컬럼명, 값)` 쌍
//!
//! 문서 안에서 같은 이름을 가진 요소 하나하나가 그 테이블의 한 행입니다.
//! 행의 필드는 다음 순서로 추론합니다: 속성(문서 순서) → 단순 텍스트 자식 요소 → 요소 자신의 텍스트.
//!
//! ```text
//! <col><name>A</name></col>          → col 행: [name=A]
//! <data desc='A'>1</data>            → data 행: [desc=A, data_Text=1]
//! ```

use std::path::Path;

use roxmltree::{Document, Node};

use crate::constants::{COLUMN_TABLE, DATA_TABLE};
use crate::error::{Result, XmlServiceError};
use crate::types::{
    ParmIo, PgmCallResult, PgmParm, ProcedureCallResult, ProcedureParm, Row, Table,
};

/// 이름이 `name`인 모든 요소를 문서 순서대로 수집합니다.
fn table_rows<'a, 'input>(doc: &'a Document<'input>, name: &str) -> Vec<Node<'a, 'input>> {
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == name)
        .collect()
}

/// 행 요소의 필드 목록 `(필드명, 값)`을 추론합니다.
fn row_fields(node: Node) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = node
        .attributes()
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect();

    let mut has_element_children = false;
    let mut own_text = String::new();
    for child in node.children() {
        if child.is_element() {
            has_element_children = true;
            if child.children().all(|c| c.is_text()) {
                let text: String = child.children().filter_map(|c| c.text()).collect();
                fields.push((child.tag_name().name().to_string(), text));
            }
        } else if child.is_text() {
            own_text.push_str(child.text().unwrap_or_default());
        }
    }

    // NOTE: Whitespace between child elements is formatting, not a value
    if !own_text.is_empty() && !(has_element_children && own_text.trim().is_empty()) {
        fields.push((format!("{}_Text", node.tag_name().name()), own_text));
    }
    fields
}

/// 파싱된 문서에서 테이블을 디코딩합니다.
///
/// 1. `col` / `data` 테이블 존재 확인
/// 2. 컬럼 수 = `col` 행 수, 컬럼 순서 = 문서 순서
/// 3. 행 수 = `data 행 수 / 컬럼 수` (정수 나눗셈, 남는 셀은 버림)
/// 4. `data` 행을 컬럼 수만큼 묶어 한 행씩 재구성: 각 셀은 위치가 아니라
///    자신의 첫 번째 필드가 가리키는 컬럼에 기록
///
/// 실패 시 부분 결과 없이 에러만 반환합니다.
///
/// # 에러
///
/// - [`XmlServiceError::MissingTable`]: `col` 또는 `data` 테이블 없음
/// - [`XmlServiceError::MalformedRow`]: 컬럼명/셀 이름 필드 없음
/// - [`XmlServiceError::DuplicateColumn`]: `col` 테이블에 중복 컬럼명
/// - [`XmlServiceError::UnknownColumn`]: 셀이 선언되지 않은 컬럼을 가리킴
pub fn decode_document(doc: &Document) -> Result<Table> {
    let col_rows = table_rows(doc, COLUMN_TABLE);
    if col_rows.is_empty() {
        return Err(XmlServiceError::MissingTable { name: COLUMN_TABLE });
    }
    let data_rows = table_rows(doc, DATA_TABLE);
    if data_rows.is_empty() {
        return Err(XmlServiceError::MissingTable { name: DATA_TABLE });
    }

    let mut columns: Vec<String> = Vec::with_capacity(col_rows.len());
    for (index, node) in col_rows.iter().enumerate() {
        let name = row_fields(*node)
            .into_iter()
            .next()
            .map(|(_, value)| value)
            .ok_or(XmlServiceError::MalformedRow {
                table: COLUMN_TABLE,
                index,
            })?;
        if columns.contains(&name) {
            return Err(XmlServiceError::DuplicateColumn { name });
        }
        columns.push(name);
    }

    let column_count = columns.len();
    let row_count = data_rows.len() / column_count;
    if data_rows.len() % column_count != 0 {
        log::debug!(
            "[DECODE] {} trailing data cells dropped ({} cells, {} columns)",
            data_rows.len() % column_count,
            data_rows.len(),
            column_count
        );
    }

    let mut rows: Vec<Row> = Vec::with_capacity(row_count);
    let cells = &data_rows[..row_count * column_count];
    for (group_index, group) in cells.chunks(column_count).enumerate() {
        let mut row: Row = columns
            .iter()
            .map(|name| (name.clone(), String::new()))
            .collect();

        for (offset, node) in group.iter().enumerate() {
            let mut fields = row_fields(*node).into_iter();
            let (_, name) = fields.next().ok_or(XmlServiceError::MalformedRow {
                table: DATA_TABLE,
                index: group_index * column_count + offset,
            })?;
            let value = fields.next().map(|(_, value)| value).unwrap_or_default();

            let slot = row
                .iter_mut()
                .find(|slot| slot.0 == name)
                .ok_or_else(|| XmlServiceError::UnknownColumn { name: name.clone() })?;
            slot.1 = value;
        }
        rows.push(row);
    }

    log::debug!(
        "[DECODE] table decoded: {} columns, {} rows",
        column_count,
        rows.len()
    );
    Ok(Table::new(columns, rows))
}

/// XML 문자열을 파싱하여 테이블을 디코딩합니다.
///
/// # 예시
///
/// ```
/// use ixmlservice::table::decode_str;
///
/// let xml = "<script><col><name>A</name></col><data desc='A'>1</data></script>";
/// let table = decode_str(xml).unwrap();
/// assert_eq!(table.columns(), ["A"]);
/// assert_eq!(table.cell(0, "A"), Some("1"));
/// ```
pub fn decode_str(xml: &str) -> Result<Table> {
    let doc = Document::parse(xml)?;
    decode_document(&doc)
}

/// XML 파일을 읽어 테이블을 디코딩합니다.
pub fn decode_file(path: impl AsRef<Path>) -> Result<Table> {
    let xml = std::fs::read_to_string(path)?;
    decode_str(&xml)
}

/// 프로그램 호출 응답에서 반환된 파라미터 값을 추출합니다.
///
/// `<parm>` 요소마다 첫 번째 `<data>` 자식의 `type` 속성과 텍스트를 읽습니다.
/// `<data>`가 없는 `<parm>`은 건너뜁니다.
pub fn decode_program_parms(xml: &str) -> Result<PgmCallResult> {
    let doc = Document::parse(xml)?;
    let parms = table_rows(&doc, "parm")
        .into_iter()
        .filter_map(|parm| {
            parm.children()
                .find(|c| c.is_element() && c.tag_name().name() == DATA_TABLE)
        })
        .map(|data| {
            let value: String = data
                .children()
                .filter(|c| c.is_text())
                .filter_map(|c| c.text())
                .collect();
            PgmParm::new(data.attribute("type").unwrap_or_default(), value)
        })
        .collect();
    Ok(PgmCallResult { parms })
}

/// 저장 프로시저 호출 응답에서 반환된 파라미터를 추출합니다.
///
/// `<parm io='..'>값</parm>` 요소를 문서 순서대로 읽고, 같은 위치의 요청 파라미터에서
/// `name`/`data_type`을 가져옵니다. `io` 속성이 없거나 알 수 없으면 요청 값을 씁니다.
pub fn decode_procedure_parms(
    xml: &str,
    requested: &[ProcedureParm],
) -> Result<ProcedureCallResult> {
    let doc = Document::parse(xml)?;
    let parms = table_rows(&doc, "parm")
        .into_iter()
        .enumerate()
        .map(|(index, parm)| {
            let value: String = parm
                .children()
                .filter(|c| c.is_text())
                .filter_map(|c| c.text())
                .collect();
            let sent = requested.get(index);
            let io = parm
                .attribute("io")
                .and_then(ParmIo::parse)
                .or_else(|| sent.map(|p| p.io))
                .unwrap_or_default();
            ProcedureParm {
                name: sent.map(|p| p.name.clone()).unwrap_or_default(),
                data_type: sent.map(|p| p.data_type.clone()).unwrap_or_default(),
                value,
                io,
            }
        })
        .collect();
    Ok(ProcedureCallResult { parms })
}
