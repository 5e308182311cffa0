use actix_web::{web, HttpResponse, Responder, Result};
use logic_prover::{check_proof, solve_premise_list_with, CheckMsg, ProverParams, StepRecord};

use crate::{SolveForm, ValidateForm};

/// Applied when a request does not bound the search itself.
const DEFAULT_STEP_LIMIT: u64 = 2_000_000;

pub(crate) async fn prover() -> impl Responder {
    HttpResponse::Ok().body(
        "Prover loaded.
Interact via the /solve and /validate endpoints"
            .to_string(),
    )
}

pub(crate) async fn solve(form: web::Form<SolveForm>) -> Result<HttpResponse> {
    let SolveForm {
        premises,
        conclusion,
        params,
    } = form.into_inner();
    let mut params: ProverParams = match params {
        Some(p) => serde_json::from_str(&p)?,
        None => ProverParams::default(),
    };
    params.step_limit.get_or_insert(DEFAULT_STEP_LIMIT);

    let res =
        web::block(move || solve_premise_list_with(&premises, &conclusion, &params)).await?;

    Ok(HttpResponse::Ok().json(res))
}

pub(crate) async fn validate(form: web::Form<ValidateForm>) -> Result<HttpResponse> {
    let ValidateForm {
        premises,
        conclusion,
        proof,
    } = form.into_inner();
    let proof: Vec<StepRecord> = serde_json::from_str(&proof)?;
    let premises: Vec<&str> = premises.split(',').collect();

    let res = match check_proof(&premises, &conclusion, &proof) {
        Ok(()) => CheckMsg {
            valid: true,
            msg: "The proof is valid".to_string(),
        },
        Err(e) => CheckMsg {
            valid: false,
            msg: e.to_string(),
        },
    };

    Ok(HttpResponse::Ok().json(res))
}
