// src/services/statement_service.rs

use std::path::PathBuf;

use chrono::NaiveDate;
use genpdf::{elements, style, Element};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, PointsRepository},
    models::points::PointTransaction,
};

/// Totais do período do extrato.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatementTotals {
    pub opening_balance: i64,
    pub credits: i64,
    pub debits: i64,
    pub closing_balance: i64,
}

/// `entries` em ordem cronológica. Sem lançamentos no período, tudo zero.
pub fn summarize(entries: &[PointTransaction]) -> StatementTotals {
    let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
        return StatementTotals::default();
    };

    let credits = entries.iter().filter(|e| e.amount > 0).map(|e| e.amount).sum();
    let debits = entries.iter().filter(|e| e.amount < 0).map(|e| -e.amount).sum();

    StatementTotals {
        opening_balance: first.balance_after - first.amount,
        credits,
        debits,
        closing_balance: last.balance_after,
    }
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

#[derive(Clone)]
pub struct StatementService {
    client_repo: ClientRepository,
    points_repo: PointsRepository,
    fonts_dir: PathBuf,
}

impl StatementService {
    pub fn new(client_repo: ClientRepository, points_repo: PointsRepository, fonts_dir: PathBuf) -> Self {
        Self { client_repo, points_repo, fonts_dir }
    }

    pub async fn generate_statement_pdf<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<u8>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // 1. Busca os Dados
        let mut tx = executor.begin().await?;

        let client = self
            .client_repo
            .find_by_id(&mut *tx, client_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("client".into()))?;

        let entries = self
            .points_repo
            .list_chronological(&mut *tx, client_id, from, to)
            .await?;

        tx.commit().await?;

        let totals = summarize(&entries);

        // 2. Configura o PDF
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| AppError::FontNotFound(self.fonts_dir.display().to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Extrato de pontos - {}", client.company_name));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(client.company_name.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        if let Some(number) = &client.business_number {
            doc.push(elements::Paragraph::new(format!("Registro: {}", number)).styled(style::Style::new().with_font_size(10)));
        }

        doc.push(elements::Break::new(1.5));

        let period = match (from, to) {
            (Some(f), Some(t)) => format!("{} ~ {}", f.format("%Y-%m-%d"), t.format("%Y-%m-%d")),
            (Some(f), None) => format!("{} ~", f.format("%Y-%m-%d")),
            (None, Some(t)) => format!("~ {}", t.format("%Y-%m-%d")),
            (None, None) => "Todo o histórico".to_string(),
        };
        doc.push(elements::Paragraph::new("EXTRATO DE PONTOS").styled(style::Style::new().bold().with_font_size(14)));
        doc.push(elements::Paragraph::new(format!("Período: {}", period)));
        doc.push(elements::Paragraph::new(format!("Saldo inicial: {} P", totals.opening_balance)));

        doc.push(elements::Break::new(2));

        // --- TABELA DE LANÇAMENTOS ---
        // Pesos: Data (2), Tipo (2), Descrição (4), Valor (2), Saldo (2)
        let mut table = elements::TableLayout::new(vec![2, 2, 4, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Data").styled(style_bold))
            .element(elements::Paragraph::new("Tipo").styled(style_bold))
            .element(elements::Paragraph::new("Descrição").styled(style_bold))
            .element(elements::Paragraph::new("Valor").styled(style_bold))
            .element(elements::Paragraph::new("Saldo").styled(style_bold))
            .push()
            .map_err(pdf_error)?;

        for entry in &entries {
            table
                .row()
                .element(elements::Paragraph::new(entry.created_at.format("%Y-%m-%d").to_string()))
                .element(elements::Paragraph::new(entry.kind.label()))
                .element(elements::Paragraph::new(entry.description.clone().unwrap_or_default()))
                .element(elements::Paragraph::new(format!("{:+}", entry.amount)))
                .element(elements::Paragraph::new(entry.balance_after.to_string()))
                .push()
                .map_err(pdf_error)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        for line in [
            format!("Créditos: {} P", totals.credits),
            format!("Débitos: {} P", totals.debits),
        ] {
            let mut paragraph = elements::Paragraph::new(line);
            paragraph.set_alignment(genpdf::Alignment::Right);
            doc.push(paragraph);
        }

        let mut closing = elements::Paragraph::new(format!("SALDO FINAL: {} P", totals.closing_balance));
        closing.set_alignment(genpdf::Alignment::Right);
        doc.push(closing.styled(style::Style::new().bold().with_font_size(12)));

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        tracing::info!(client_id = %client_id, entries = entries.len(), "Extrato de pontos gerado");
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::points::TransactionKind;

    fn entry(amount: i64, balance_after: i64) -> PointTransaction {
        PointTransaction {
            id: Uuid::new_v4(),
            client_id: Uuid::nil(),
            amount,
            kind: TransactionKind::AdminAdjustment,
            reference_id: None,
            balance_after,
            description: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn totals_are_derived_from_the_entries() {
        // Saldo de 200 antes do período
        let entries = vec![entry(1000, 1200), entry(-300, 900), entry(50, 950)];

        assert_eq!(
            summarize(&entries),
            StatementTotals { opening_balance: 200, credits: 1050, debits: 300, closing_balance: 950 }
        );
    }

    #[test]
    fn empty_period_is_all_zero() {
        assert_eq!(summarize(&[]), StatementTotals::default());
    }

    #[sqlx::test]
    #[ignore = "precisa de DATABASE_URL"]
    async fn statement_runs_over_a_pooled_connection(pool: sqlx::PgPool) {
        let client = ClientRepository::new().create(&pool, "ACME", None, None, None).await.unwrap();
        let service = StatementService::new(
            ClientRepository::new(),
            PointsRepository::new(),
            PathBuf::from("./no-fonts-here"),
        );
        let mut conn = pool.acquire().await.unwrap();

        let missing = service.generate_statement_pdf(&mut *conn, Uuid::new_v4(), None, None).await;
        assert!(matches!(missing, Err(AppError::ResourceNotFound(_))));

        // Os dados foram lidos; só a fonte falta
        let result = service.generate_statement_pdf(&mut *conn, client.id, None, None).await;
        assert!(matches!(result, Err(AppError::FontNotFound(_))));
    }
}
